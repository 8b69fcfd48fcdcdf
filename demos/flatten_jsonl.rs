//! Flatten a JSON-lines file of feature tuples.
//!
//! Each line must be a JSON array, e.g. `[1.5, "red", [0.1, 0.2]]`. Without a
//! path argument a small built-in dataset is used. The fitted parameters are
//! saved next to the input (or to the temp directory) and reloaded to check
//! that the restored flattener produces the same matrix.
//!
//! Run with: RUST_LOG=debug cargo run --example flatten_jsonl -- data.jsonl

use featureforge::{
    tuple_from_json, FeatureFlattener, FeatureTuple, FittedFeatureFlattener, FittedTransformer,
    Transformer,
};
use std::error::Error;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = r#"[5.1, "setosa", [1.4, 0.2]]
[7.0, "versicolor", [4.7, 1.4]]
[6.3, "virginica", [6.0, 2.5]]
[4.9, "setosa", [1.4, 0.2]]"#;

fn read_tuples(lines: impl BufRead) -> Result<Vec<FeatureTuple>, Box<dyn Error>> {
    let mut tuples = Vec::new();
    for line in lines.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(&line)?;
        tuples.push(tuple_from_json(&value)?);
    }
    Ok(tuples)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let input = std::env::args().nth(1).map(PathBuf::from);
    let tuples = match &input {
        Some(path) => read_tuples(BufReader::new(std::fs::File::open(path)?))?,
        None => read_tuples(SAMPLE.as_bytes())?,
    };
    println!("Read {} tuples", tuples.len());

    let flattener = FeatureFlattener::new().with_sparse(false);
    let (fitted, matrix) = flattener.fit_transform(&tuples)?;

    println!("\n=== Fitted layout ===");
    println!("Tuple size:     {}", fitted.n_features_in());
    println!("Output columns: {}", fitted.n_features_out());
    println!("Schema:         {:?}", fitted.schema().kinds());
    println!("Features:       {}", fitted.feature_names().join(", "));

    let (rows, cols) = matrix.shape();
    println!("\n=== Matrix ({rows} x {cols}) ===");
    for row in matrix.to_dense().rows() {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:6.2}")).collect();
        println!("{}", cells.join(" "));
    }

    let params_path = match &input {
        Some(path) => path.with_extension("flattener.bin"),
        None => std::env::temp_dir().join("flatten_jsonl.flattener.bin"),
    };
    fitted.save_to_file(&params_path)?;
    let restored = FittedFeatureFlattener::load_from_file(&params_path)?;
    let again = restored.transform(&tuples)?;
    println!(
        "\nSaved to {} and reloaded; identical output: {}",
        params_path.display(),
        again == matrix
    );

    Ok(())
}
