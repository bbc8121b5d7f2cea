use clap::{
    crate_authors, crate_description, crate_name, crate_version, App, AppSettings, Arg,
    ArgMatches, SubCommand,
};
use derive_more::Display;
use graphq::{parse, Query, Row};
use serde_json::Value;
use std::{
    error::Error,
    io::{self, Read},
};

#[derive(Debug, Display, PartialEq)]
enum Err {
    #[display(fmt = "{}: {}", _0, _1)]
    CompileError(String, String),
    #[display(fmt = "{}: expected a JSON array of row objects", _0)]
    RowsError(String),
}

impl std::error::Error for Err {}

fn read_input(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
    }
}

fn load_query(matches: &ArgMatches) -> Result<Query, Box<dyn Error>> {
    let path = matches.value_of("QUERY").unwrap();
    let input = read_input(path)?;
    Ok(parse(&input).map_err(|e| Err::CompileError(path.to_owned(), e.to_string()))?)
}

fn load_rows(path: &str) -> Result<Vec<Row>, Box<dyn Error>> {
    let rows = match serde_json::from_str::<Value>(&read_input(path)?)? {
        Value::Array(rows) => rows,
        _ => return Err(Err::RowsError(path.to_owned()).into()),
    };
    let mut objects = Vec::with_capacity(rows.len());
    for row in rows {
        match row {
            Value::Object(row) => objects.push(row),
            _ => return Err(Err::RowsError(path.to_owned()).into()),
        }
    }
    Ok(objects)
}

fn handle_compile(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    println!("{}", load_query(matches)?.text());
    Ok(())
}

fn handle_tree(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    print!("{}", load_query(matches)?.tree());
    Ok(())
}

fn handle_reduce(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let query = load_query(matches)?;
    let rows = load_rows(matches.value_of("ROWS").unwrap())?;
    let result = Value::Array(
        query
            .reduce(&rows)
            .into_iter()
            .map(Value::Object)
            .collect(),
    );
    if matches.is_present("pretty") {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let matches = App::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("compile")
                .about("Prints the query text of the request")
                .arg(
                    Arg::with_name("QUERY")
                        .help("Request file, or - for stdin")
                        .required(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("tree")
                .about("Prints the validated request tree")
                .arg(
                    Arg::with_name("QUERY")
                        .help("Request file, or - for stdin")
                        .required(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("reduce")
                .about("Folds result rows into nested entities")
                .after_help(
                    r"ROWS must hold a JSON array of objects keyed by the columns of the
return clause printed by the compile subcommand.
",
                )
                .arg(
                    Arg::with_name("QUERY")
                        .help("Request file, or - for stdin")
                        .required(true),
                )
                .arg(
                    Arg::with_name("ROWS")
                        .help("JSON rows file, or - for stdin")
                        .required(true),
                )
                .arg(
                    Arg::with_name("pretty")
                        .help("Pretty-prints the output")
                        .long("pretty")
                        .takes_value(false),
                ),
        )
        .get_matches();
    if let Some(matches) = matches.subcommand_matches("compile") {
        handle_compile(matches)?;
    } else if let Some(matches) = matches.subcommand_matches("tree") {
        handle_tree(matches)?;
    } else if let Some(matches) = matches.subcommand_matches("reduce") {
        handle_reduce(matches)?;
    }
    Ok(())
}
