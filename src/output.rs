use colored::Colorize;
use serde::Serialize;

use crate::{
    convert::{Conversion, Direction},
    report::QaReport
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:        OutputFormat,
    pub colored:       bool,
    pub show_warnings: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:        OutputFormat::Text,
            colored:       true,
            show_warnings: true
        }
    }
}

/// Conversion result for serialization
#[derive(Debug, Serialize)]
struct ConversionResult<'a> {
    direction: Direction,
    #[serde(flatten)]
    conversion: &'a Conversion
}

/// Conversion plus checklist result for serialization
#[derive(Debug, Serialize)]
struct CheckResultDoc<'a> {
    direction: Direction,
    #[serde(flatten)]
    conversion: &'a Conversion,
    report:     &'a QaReport
}

/// Format a conversion result based on output options
pub fn format_conversion(
    conversion: &Conversion,
    direction: Direction,
    opts: &OutputOptions
) -> String {
    let doc = ConversionResult {
        direction,
        conversion
    };
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(&doc).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(&doc).unwrap_or_default(),
        OutputFormat::Text => format_text(conversion, opts)
    }
}

/// Format a conversion plus its QA report
pub fn format_check(
    conversion: &Conversion,
    report: &QaReport,
    direction: Direction,
    opts: &OutputOptions
) -> String {
    let doc = CheckResultDoc {
        direction,
        conversion,
        report
    };
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(&doc).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(&doc).unwrap_or_default(),
        OutputFormat::Text => {
            let mut out = format_text(conversion, opts);
            out.push('\n');
            out.push_str(&report.render(opts.colored));
            out
        }
    }
}

fn format_text(conversion: &Conversion, opts: &OutputOptions) -> String {
    let mut out = String::new();
    let rule = "=".repeat(70);

    if opts.show_warnings && !conversion.warnings.is_empty() {
        let header = format!("CONVERSION WARNINGS ({})", conversion.warnings.len());
        out.push_str(&rule);
        out.push('\n');
        if opts.colored {
            out.push_str(&header.yellow().bold().to_string());
        } else {
            out.push_str(&header);
        }
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        for warning in &conversion.warnings {
            let line = warning.to_string();
            if opts.colored {
                out.push_str(&line.yellow().to_string());
            } else {
                out.push_str(&line);
            }
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str(&rule);
    out.push('\n');
    if opts.colored {
        out.push_str(&"CONVERTED QUERY".cyan().bold().to_string());
    } else {
        out.push_str("CONVERTED QUERY");
    }
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&conversion.sql);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert_oracle_to_azure;

    fn plain_opts(format: OutputFormat) -> OutputOptions {
        OutputOptions {
            format,
            colored: false,
            show_warnings: true
        }
    }

    #[test]
    fn test_text_output_contains_query() {
        let conversion = convert_oracle_to_azure("SELECT NVL(a, b) FROM t");
        let text = format_conversion(
            &conversion,
            Direction::OracleToAzure,
            &plain_opts(OutputFormat::Text)
        );
        assert!(text.contains("CONVERTED QUERY"));
        assert!(text.contains("ISNULL(a, b)"));
    }

    #[test]
    fn test_warnings_banner_present() {
        let conversion =
            convert_oracle_to_azure("SELECT * FROM t WHERE REGEXP_LIKE(name, '^[A-Z]+$')");
        let text = format_conversion(
            &conversion,
            Direction::OracleToAzure,
            &plain_opts(OutputFormat::Text)
        );
        assert!(text.contains("CONVERSION WARNINGS"));
    }

    #[test]
    fn test_warnings_hidden_when_disabled() {
        let conversion =
            convert_oracle_to_azure("SELECT * FROM t WHERE REGEXP_LIKE(name, '^[A-Z]+$')");
        let opts = OutputOptions {
            format:        OutputFormat::Text,
            colored:       false,
            show_warnings: false
        };
        let text = format_conversion(&conversion, Direction::OracleToAzure, &opts);
        assert!(!text.contains("CONVERSION WARNINGS"));
    }

    #[test]
    fn test_json_output_round_trips() {
        let conversion = convert_oracle_to_azure("SELECT NVL(a, b) FROM t");
        let json = format_conversion(
            &conversion,
            Direction::OracleToAzure,
            &plain_opts(OutputFormat::Json)
        );
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["direction"], "oracle-to-azure");
        assert_eq!(value["sql"], "SELECT ISNULL(a, b) FROM t");
    }

    #[test]
    fn test_yaml_output_has_sql_key() {
        let conversion = convert_oracle_to_azure("SELECT 1 FROM DUAL");
        let yaml = format_conversion(
            &conversion,
            Direction::OracleToAzure,
            &plain_opts(OutputFormat::Yaml)
        );
        assert!(yaml.contains("sql:"));
    }
}
