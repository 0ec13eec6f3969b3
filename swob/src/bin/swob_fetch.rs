//! Demo of fetching one station's latest snow depth.
//!
//! Usage: `swob_fetch <STATION> [VARIABLE]`

use chrono::Utc;
use swob::{ClientSettings, ObservationHour, Station, SwobClient, SNOW_DEPTH};

fn main() {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let station: Station = match args.next().map(|s| s.parse()) {
        Some(Ok(s)) => s,
        Some(Err(e)) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
        None => {
            eprintln!("usage: swob_fetch <STATION> [VARIABLE]");
            std::process::exit(2);
        }
    };
    let variable = args.next().unwrap_or_else(|| SNOW_DEPTH.to_owned());

    let client = SwobClient::new(ClientSettings::default()).expect("could not create client");
    let hour = ObservationHour::from(Utc::now());
    println!("fetching {variable} for {station} at {hour}...");
    match client.fetch(&station, &hour).and_then(|doc| doc.value_of(&variable)) {
        Ok(Some(v)) => println!("{station}: {v}"),
        Ok(None) => println!("{station}: no {variable} reported"),
        Err(e) => {
            println!("error: {e}");
            std::process::exit(1);
        }
    }
}
