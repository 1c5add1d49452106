fn main() {
    if let Err(err) = tealeaves::cli::run() {
        tealeaves::ui::eprintln_error(&err);
        std::process::exit(tealeaves::exit::exit_code(&err));
    }
}
