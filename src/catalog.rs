use clap::{App, Arg, ArgMatches, SubCommand};
use clansphere_api::catalogs::CatalogPayload;
use clansphere_common::i18n::Catalog;
use std::fs;
use std::process::exit;

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("catalog")
        .about("Inspect and query translation catalog files")
        .subcommand(
            SubCommand::with_name("check")
                .arg(
                    Arg::with_name("file")
                        .takes_value(true)
                        .required(true)
                        .help("Path to a JSON catalog payload"),
                )
                .about("Validate a catalog payload"),
        )
        .subcommand(
            SubCommand::with_name("lookup")
                .arg(
                    Arg::with_name("file")
                        .takes_value(true)
                        .required(true)
                        .help("Path to a JSON catalog payload"),
                )
                .arg(
                    Arg::with_name("key")
                        .takes_value(true)
                        .required(true)
                        .help("The source string to look up"),
                )
                .arg(
                    Arg::with_name("plural")
                        .short("p")
                        .long("plural")
                        .takes_value(true)
                        .help("Plural form to fall back to"),
                )
                .arg(
                    Arg::with_name("count")
                        .short("c")
                        .long("count")
                        .takes_value(true)
                        .help("Count selecting the plural form (requires --plural)"),
                )
                .about("Look up a translation"),
        )
}

pub fn run<'a>(args: &ArgMatches<'a>) {
    match args.subcommand() {
        ("check", Some(x)) => check(x),
        ("lookup", Some(x)) => lookup(x),
        _ => println!("Unknown subcommand"),
    }
}

fn load(file: &str) -> Catalog {
    let data = fs::read_to_string(file).expect("Couldn't read the catalog file");
    let payload: CatalogPayload = match serde_json::from_str(&data) {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("{}: invalid payload: {}", file, e);
            exit(1);
        }
    };
    match Catalog::from_payload(payload) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("{}: rejected: {:?}", file, e);
            exit(1);
        }
    }
}

fn check<'a>(args: &ArgMatches<'a>) {
    let file = args.value_of("file").expect("No file provided");
    let catalog = load(file);
    println!(
        "{}: ok ({} messages, locale {})",
        file,
        catalog.len(),
        catalog.locale()
    );
}

fn lookup<'a>(args: &ArgMatches<'a>) {
    let file = args.value_of("file").expect("No file provided");
    let key = args.value_of("key").expect("No key provided");
    let catalog = load(file);

    match args.value_of("plural") {
        Some(plural) => {
            let count = args
                .value_of("count")
                .unwrap_or("1")
                .parse()
                .expect("--count must be a number");
            println!("{}", catalog.ngettext(key, plural, count));
        }
        None => println!("{}", catalog.gettext(key)),
    }
}
