use crate::*;

#[cfg(feature = "bin")]
pub mod bin {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Parser)]
    #[command(version = env!("FULL_VERSION"), about = env!("CARGO_PKG_DESCRIPTION"))]
    struct Args {
        /// The proof scripts to run, in order, sharing one session
        inputs: Vec<PathBuf>,
        /// Prevents propositions from printing messages
        #[clap(long)]
        no_messages: bool,
        /// Prints every proof in the session after the scripts have run
        #[clap(long)]
        print_proofs: bool,
    }

    /// Start a command-line interface for a proof session.
    ///
    /// Runs the given scripts, or reads commands from standard input when
    /// there are none.
    #[allow(clippy::disallowed_macros)]
    pub fn cli(mut session: Session) {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .format_timestamp(None)
            .format_target(false)
            .parse_default_env()
            .init();

        let args = Args::parse();
        if args.no_messages {
            session.disable_messages();
        }

        if args.inputs.is_empty() {
            log::info!("Welcome to the propositions REPL! (build: {})", env!("FULL_VERSION"));
            if let Err(err) = session.repl() {
                log::error!("{err}");
                std::process::exit(1)
            }
        } else {
            for input in &args.inputs {
                match session.parse_and_run_file(input) {
                    Ok(msgs) => {
                        for msg in msgs {
                            println!("{msg}");
                        }
                    }
                    Err(err) => {
                        log::error!("{err}");
                        std::process::exit(1)
                    }
                }
            }
        }

        if args.print_proofs {
            for (name, proof) in session.proofs() {
                println!("{name}:\n{proof}");
            }
        }
    }
}
