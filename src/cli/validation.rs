use crate::cli::args::CliArgs;
use crate::loader::MAX_AMOUNT;
use crate::output::OutputFormat;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(amount) = args.amount {
        if amount == 0 || amount > MAX_AMOUNT {
            return Err(format!("invalid amount {amount}, expected 1-{MAX_AMOUNT}"));
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    crate::utils::parse_sort_clicks(&args.sort).map_err(|e| format!("invalid --sort {e}"))?;
    if let Some(raw) = args.filter_field.as_deref() {
        crate::utils::parse_filter_field(raw)
            .map_err(|e| format!("invalid --filter-field '{raw}': {e}"))?;
    }
    if args.filter_value.is_some() && args.filter_field.is_none() {
        return Err("--filter-value requires --filter-field".to_string());
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json or html"
            ));
        }
    }
    Ok(())
}

