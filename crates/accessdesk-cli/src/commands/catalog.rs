use accessdesk_core::{CatalogOption, INTEGRATION_PROVIDERS, StepKind};
use anyhow::Result;
use colored::Colorize;
use serde_json::{Value, json};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;
use crate::output::print_value;

fn options(opts: &[CatalogOption]) -> Value {
    opts.iter()
        .map(|o| json!({ "value": o.value, "label": o.label }))
        .collect()
}

fn kind_catalog(kind: StepKind) -> Value {
    kind.step_types()
        .iter()
        .map(|t| {
            json!({
                "value": t.value,
                "label": t.label,
                "targets": options(kind.targets(t.value)),
            })
        })
        .collect()
}

pub fn catalog_value(kinds: &[StepKind]) -> Value {
    let mut out = serde_json::Map::new();
    out.insert("providers".into(), options(INTEGRATION_PROVIDERS));
    for kind in kinds {
        out.insert(kind.to_string(), kind_catalog(*kind));
    }
    Value::Object(out)
}

pub fn show(kind: Option<StepKind>, format: OutputFormat) -> Result<()> {
    let kinds = match kind {
        Some(kind) => vec![kind],
        None => vec![StepKind::Provisioning, StepKind::Revocation],
    };
    if !matches!(format, OutputFormat::Table) {
        return print_value(&catalog_value(&kinds), format);
    }

    let providers: Vec<String> = INTEGRATION_PROVIDERS
        .iter()
        .map(|p| format!("{} ({})", p.label, p.value))
        .collect();
    println!("{}: {}", "Providers".cyan(), providers.join(", "));
    for kind in kinds {
        let mut builder = Builder::default();
        builder.push_record(["Step type", "Targets"]);
        for step_type in kind.step_types() {
            let targets: Vec<&str> = kind
                .targets(step_type.value)
                .iter()
                .map(|t| t.value)
                .collect();
            builder.push_record([step_type.value.to_string(), targets.join(", ")]);
        }
        println!("{} steps", kind.to_string().cyan());
        println!("{}", builder.build().with(Style::rounded()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_value_shape() {
        let value = catalog_value(&[StepKind::Revocation]);
        assert_eq!(value["providers"].as_array().unwrap().len(), 5);
        assert!(value.get("provisioning").is_none());
        let disable = &value["revocation"][2];
        assert_eq!(disable["value"], "disable_account");
        assert_eq!(disable["targets"][1]["value"], "permanent");
    }
}
