use std::io::Write;

use colored::*;

use super::report::{ApiReport, EntityReport, FieldReport, Report, TypeReport};
use crate::classification::diagnostics::{group_by_location, location_prefix};
use crate::classification::MetaClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_entity(&mut self, entity: &EntityReport) -> anyhow::Result<()> {
        let role = match entity.role {
            MetaClass::Model => entity.role.as_str().green(),
            MetaClass::Viewmodel => entity.role.as_str().cyan(),
            MetaClass::Service => entity.role.as_str().magenta(),
            MetaClass::Enumeration => entity.role.as_str().blue(),
            MetaClass::Unknown | MetaClass::Unused => entity.role.log_label().red(),
        };
        write!(self.writer, "{} {}", role.bold(), entity.name.bold())?;
        if let Some(header) = &entity.header {
            write!(self.writer, " ({})", header.dimmed())?;
        }
        writeln!(self.writer)?;

        if let Some(base) = &entity.base {
            writeln!(self.writer, "  base: {}", base)?;
        }
        for field in &entity.fields {
            writeln!(self.writer, "  {}", format_field(field))?;
        }
        for field in &entity.derived_fields {
            writeln!(self.writer, "  {} {}", format_field(field), "(inherited)".dimmed())?;
        }
        for api in &entity.apis {
            writeln!(self.writer, "  {}", format_api(api))?;
        }
        for api in &entity.callback_apis {
            writeln!(self.writer, "  callback {}", format_api(api))?;
        }
        for constant in &entity.constants {
            writeln!(self.writer, "  {} = {}", constant.name, constant.value)?;
        }
        if !entity.dependent_headers.is_empty() {
            let headers: Vec<&str> = entity.dependent_headers.iter().map(String::as_str).collect();
            writeln!(self.writer, "  includes: {}", headers.join(", "))?;
        }
        self.write_diagnostics(entity)
    }

    fn write_diagnostics(&mut self, entity: &EntityReport) -> anyhow::Result<()> {
        for group in group_by_location(&entity.diagnostics) {
            let prefix = location_prefix(group.location);
            for message in group.messages {
                writeln!(self.writer, "    {}{}", prefix, message.yellow())?;
            }
        }
        Ok(())
    }
}

fn format_type(ty: &TypeReport) -> String {
    let mut spelled = match &ty.container {
        Some(container) => format!("{}<{}>", container, ty.type_name),
        None => ty.type_name.clone(),
    };
    if !ty.traits.is_empty() {
        spelled = format!("{} [{}]", spelled, ty.traits);
    }
    if let Some(alias) = &ty.alias {
        spelled = format!("{} (alias {})", spelled, alias);
    }
    spelled
}

fn format_field(field: &FieldReport) -> String {
    match &field.init_value {
        Some(value) => format!("{}: {} = {}", field.name, format_type(&field.type_info), value),
        None => format!("{}: {}", field.name, format_type(&field.type_info)),
    }
}

fn format_api(api: &ApiReport) -> String {
    let params: Vec<String> = api
        .params
        .iter()
        .map(|p| format!("{}: {}", p.name, format_type(&p.type_info)))
        .collect();
    format!(
        "{}({}) -> {}",
        api.name,
        params.join(", "),
        format_type(&api.returns)
    )
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", report.summary.parsed_line().bold())?;
        for entity in &report.entities {
            self.write_entity(entity)?;
        }
        if !report.unclassified.is_empty() {
            writeln!(
                self.writer,
                "{}",
                format!("{} unclassified", report.unclassified.len()).red()
            )?;
            for entity in &report.unclassified {
                self.write_entity(entity)?;
            }
        }
        Ok(())
    }
}

pub fn create_writer(format: OutputFormat, writer: Box<dyn Write>) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}
