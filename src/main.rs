use clap::App;

mod catalog;
mod service;

fn main() {
    let mut app = App::new("Clansphere CLI")
        .bin_name("csp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tools to work with Clansphere translation catalogs and JSON services.")
        .subcommand(catalog::command())
        .subcommand(service::command());
    let matches = app.clone().get_matches();

    match dotenv::dotenv() {
        Ok(path) => println!("Configuration read from {}", path.display()),
        Err(ref e) if e.not_found() => (),
        e => e.map(|_| ()).unwrap(),
    }
    tracing_subscriber::fmt::init();

    match matches.subcommand() {
        ("catalog", Some(args)) => catalog::run(args),
        ("service", Some(args)) => service::run(args),
        _ => app.print_help().expect("Couldn't print help"),
    };
}
