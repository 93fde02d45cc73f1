use hostedit::error::{HostsError, EXIT_OTHER};

fn main() {
    if let Err(e) = hostedit::cli::run() {
        eprintln!("Error: {e:#}");
        let code = e
            .downcast_ref::<HostsError>()
            .map_or(EXIT_OTHER, HostsError::exit_code);
        std::process::exit(code);
    }
}
