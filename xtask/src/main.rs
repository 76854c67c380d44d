//! Developer tasks (schema generation, contract fixtures, catalog checks).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use permatrix_domain::validate;
use permatrix_types::{all_operation_ids, lookup_operation};
use schemars::schema_for;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(manifest_dir)
}

/// Get the schemas directory path.
fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

/// Get the contracts/fixtures directory path.
fn contracts_fixtures_dir() -> PathBuf {
    project_root().join("contracts").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(permatrix_settings::PermatrixConfigV1)
}

fn generate_decision_schema() -> schemars::Schema {
    schema_for!(permatrix_types::Decision)
}

fn generate_requirement_schema() -> schemars::Schema {
    schema_for!(permatrix_types::Requirement)
}

/// List of schemas to generate.
fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "permatrix.config.v1.json",
            generate: generate_config_schema,
        },
        SchemaSpec {
            filename: "permatrix.decision.v1.json",
            generate: generate_decision_schema,
        },
        SchemaSpec {
            filename: "permatrix.requirement.v1.json",
            generate: generate_requirement_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }
        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Validate every decision fixture under contracts/fixtures/decisions against the
/// generated decision schema, and check production fixtures carry no detail.
fn conform() -> anyhow::Result<()> {
    let mut schema = serde_json::to_value(generate_decision_schema())
        .context("Failed to convert decision schema")?;
    // The jsonschema crate tries to resolve $id as a URI.
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$id");
    }
    let compiled = jsonschema::draft7::new(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile decision schema: {}", e))?;
    println!("✓ permatrix.decision.v1 schema compiles");

    let dir = contracts_fixtures_dir().join("decisions");
    if !dir.exists() {
        bail!("decision fixtures not found at {}", dir.display());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut errors = Vec::new();
    for path in &paths {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {} as JSON", name))?;

        for err in compiled.iter_errors(&value) {
            errors.push(format!("{}: schema validation: {}", name, err));
        }
        if value["schema"] != permatrix_types::SCHEMA_DECISION_V1 {
            errors.push(format!("{name}: schema is not {}", permatrix_types::SCHEMA_DECISION_V1));
        }
        let diagnostic = name.contains("diagnostic");
        if !diagnostic && value.get("detail").is_some() {
            errors.push(format!("{name}: production decision carries denial detail"));
        }
    }

    if errors.is_empty() {
        println!("✓ {} decision fixtures conform", paths.len());
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!("Conformance failed with {} errors", errors.len())
    }
}

/// Check the operation catalog against the seed matrix.
///
/// Every operation must resolve, declare at least one triple, and only name
/// page/tab pairs the seed matrix configures. The seed itself must be clean.
fn catalog_coverage() -> anyhow::Result<()> {
    let seed = permatrix_settings::seed_matrix();
    let mut errors = Vec::new();

    if let Err(violation) = validate(&seed) {
        errors.push(format!("seed matrix: {violation}"));
    }

    let configured: BTreeSet<(String, String)> = seed.known_tabs().into_iter().collect();
    let mut seen = BTreeSet::new();

    for id in all_operation_ids() {
        if !seen.insert(*id) {
            errors.push(format!("Operation '{}' is listed twice", id));
        }
        let Some(op) = lookup_operation(id) else {
            errors.push(format!("Operation '{}' does not resolve", id));
            continue;
        };
        if op.summary.is_empty() {
            errors.push(format!("Operation '{}' has empty summary", id));
        }
        let triples = op.requirement.triples();
        if triples.is_empty() {
            errors.push(format!("Operation '{}' has an empty requirement", id));
        }
        for t in triples {
            if !configured.contains(&(t.page.clone(), t.tab.clone())) {
                errors.push(format!(
                    "Operation '{}' needs {}/{} which the seed matrix never configures",
                    id, t.page, t.tab
                ));
            }
        }
    }

    if errors.is_empty() {
        println!("✓ {} operations resolve", all_operation_ids().len());
        println!("✓ seed matrix covers every gated page/tab");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!("Catalog coverage failed with {} errors", errors.len())
    }
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate contract decision fixtures against the decision schema");
    eprintln!("  catalog-coverage  Check every catalog operation against the seed matrix");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "catalog-coverage" => catalog_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
