use clap::{App, Arg, ArgMatches, SubCommand};
use clansphere_common::services::ServiceClient;
use std::process::exit;

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("service")
        .about("Talk to the JSON services of an instance")
        .subcommand(
            SubCommand::with_name("call")
                .arg(
                    Arg::with_name("identifier")
                        .takes_value(true)
                        .required(true)
                        .help("The service to call, e.g. get_comment"),
                )
                .arg(
                    Arg::with_name("param")
                        .short("p")
                        .long("param")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1)
                        .help("Query parameter, as name=value"),
                )
                .arg(
                    Arg::with_name("root")
                        .short("r")
                        .long("root")
                        .takes_value(true)
                        .help("Root URL of the instance (defaults to SPHERE_ROOT_URL)"),
                )
                .about("Call a service and print the decoded response"),
        )
}

pub fn run<'a>(args: &ArgMatches<'a>) {
    match args.subcommand() {
        ("call", Some(x)) => call(x),
        _ => println!("Unknown subcommand"),
    }
}

fn call<'a>(args: &ArgMatches<'a>) {
    let identifier = args.value_of("identifier").expect("No service provided");
    let params: Vec<(String, String)> = args
        .values_of("param")
        .map(|values| {
            values
                .map(|value| {
                    let mut split = value.splitn(2, '=');
                    (
                        split.next().unwrap_or("").to_string(),
                        split.next().unwrap_or("").to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    let client = match args.value_of("root") {
        Some(root) => ServiceClient::new(root),
        None => ServiceClient::from_env(),
    }
    .expect("Couldn't build the HTTP client");

    let runtime = tokio::runtime::Runtime::new().expect("Couldn't start the runtime");
    match runtime.block_on(client.call_value(identifier, &params)) {
        Ok(value) => println!(
            "{}",
            serde_json::to_string_pretty(&value).expect("Couldn't format the response")
        ),
        Err(e) => {
            eprintln!("Call to {} failed: {:?}", identifier, e);
            exit(1);
        }
    }
}
