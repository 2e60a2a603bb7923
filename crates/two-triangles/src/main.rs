use orbit_engine::device::StartupError;
use orbit_engine::logging::init_logging;
use two_triangles::DemoConfig;

fn main() {
    let config = DemoConfig::default();
    init_logging(config.logging.clone());

    if let Err(e) = two_triangles::run(config) {
        eprintln!("{e:#}");
        std::process::exit(StartupError::EXIT_CODE);
    }
}
