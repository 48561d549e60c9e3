use propositions::Session;

fn main() {
    propositions::cli::bin::cli(Session::default())
}
