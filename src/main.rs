fn main() {
    #[cfg(feature = "cli")]
    ncrlite::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("ncrlite: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
