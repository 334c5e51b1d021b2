use kmeans_miner::service::Session;
use kmeans_miner::*;
use tracing_subscriber::EnvFilter;

const PLAYTENNIS: [(&str, f64, &str, &str, &str); 14] = [
    ("sunny", 30.3, "high", "weak", "no"),
    ("sunny", 30.3, "high", "strong", "no"),
    ("overcast", 30.0, "high", "weak", "yes"),
    ("rain", 13.0, "high", "weak", "yes"),
    ("rain", 0.0, "normal", "weak", "yes"),
    ("rain", 0.0, "normal", "strong", "no"),
    ("overcast", 0.1, "normal", "strong", "yes"),
    ("sunny", 13.0, "high", "weak", "no"),
    ("sunny", 0.1, "normal", "weak", "yes"),
    ("rain", 12.0, "normal", "weak", "yes"),
    ("sunny", 12.5, "normal", "strong", "yes"),
    ("overcast", 12.5, "high", "strong", "yes"),
    ("overcast", 29.21, "normal", "weak", "yes"),
    ("rain", 12.5, "high", "strong", "no"),
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tables = MemoryTable::new();
    tables.create_table("playtennis", &[
        ("outlook", false), ("temperature", true), ("humidity", false), ("wind", false), ("playtennis", false),
    ]);
    for (outlook, temperature, humidity, wind, play) in PLAYTENNIS {
        tables.insert("playtennis", vec![outlook.into(), temperature.into(), humidity.into(), wind.into(), play.into()])?;
    }

    let k = std::env::args().nth(1).and_then(|k| k.parse().ok()).unwrap_or(3);
    let mut session = Session::new(tables);
    session.load_table("playtennis")?;
    let outcome = session.cluster(k, &KMeansConfig::default())?;
    println!("{}", outcome.text);

    let path = std::env::temp_dir().join("playtennis.kmeans");
    session.save(&path)?;
    println!("Stored clusters:\n{}", session.open(&path)?);
    Ok(())
}
