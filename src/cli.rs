//! cli.rs — Argumentos de linha de comando e o relatório offline

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::Config;
use crate::pipeline::{self, Report};

#[derive(Debug, Parser)]
#[command(name = "disponibilidade", version, about = "Relatório de disponibilidade a partir de logs de alarmes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sobe o servidor HTTP (padrão).
    Serve,
    /// Processa um arquivo localmente e grava a planilha.
    Report {
        /// Arquivo CSV, XLS ou XLSX.
        input: PathBuf,
        /// Destino da planilha (padrão: `output_file` da configuração).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Imprime o relatório em JSON em vez de tabela.
        #[arg(long)]
        json: bool,
    },
}

/// Executa o subcomando `report`.
pub fn run_report(
    config: &Config,
    input: PathBuf,
    output: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| config.output_file.clone());
    let report = pipeline::process_file(&input, &output, &config.columns, &config.policy())?;
    info!("Relatório gravado em {}", output.display());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_table(&report));
    }
    Ok(())
}

/// Tabela de texto alinhada com as colunas da planilha.
pub fn format_table(report: &Report) -> String {
    let rows = report.display_rows();
    let source_width = rows
        .iter()
        .map(|r| r.alarm_source.chars().count())
        .chain(std::iter::once("Alarm Source".len()))
        .max()
        .unwrap_or_default();
    let downtime_width = rows
        .iter()
        .map(|r| r.downtime.len())
        .chain(std::iter::once("Total Downtime".len()))
        .max()
        .unwrap_or_default();

    let mut out = format!(
        "{:<sw$}  {:<dw$}  {}\n",
        "Alarm Source",
        "Total Downtime",
        "Availability (%)",
        sw = source_width,
        dw = downtime_width
    );
    for row in &rows {
        out.push_str(&format!(
            "{:<sw$}  {:<dw$}  {:.2}\n",
            row.alarm_source,
            row.downtime,
            row.availability,
            sw = source_width,
            dw = downtime_width
        ));
    }
    out
}
