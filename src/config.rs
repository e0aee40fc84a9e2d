use std::path::PathBuf;

use config as config_crate;
use serde::Deserialize;

use crate::schema::ColumnMapping;
use crate::types::{AvailabilityPolicy, MIN_DURATION_MINUTES, TARGET_ALARM_ID, WINDOW_MINUTES};

/// Configuração operacional do sistema.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Endereço de escuta do servidor HTTP.
    pub listen_address: String,
    /// Diretório onde os uploads são gravados.
    pub upload_dir: PathBuf,
    /// Planilha gerada pela última execução (servida em /download).
    pub output_file: PathBuf,
    /// ID de alarme que conta como indisponibilidade.
    pub target_alarm_id: i64,
    /// Duração mínima, em minutos, de cada alarme.
    pub min_duration_minutes: f64,
    /// Janela de observação em minutos.
    pub window_minutes: f64,
    /// Tamanho máximo do upload em bytes.
    pub max_upload_bytes: usize,
    /// Cabeçalhos esperados no arquivo de entrada.
    #[serde(default)]
    pub columns: ColumnMapping,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:5000".to_string(),
            upload_dir: PathBuf::from("uploads"),
            output_file: PathBuf::from("uploads/availability_results.xlsx"),
            target_alarm_id: TARGET_ALARM_ID,
            min_duration_minutes: MIN_DURATION_MINUTES,
            window_minutes: WINDOW_MINUTES,
            max_upload_bytes: 20 * 1024 * 1024,
            columns: ColumnMapping::default(),
        }
    }
}

impl Config {
    /// Carrega `config.{toml,yaml,json}` (opcional) e variáveis `ALARM_*`.
    ///
    /// `PORT` sobrescreve apenas a porta do endereço de escuta.
    pub fn load() -> anyhow::Result<Self> {
        let defaults = Config::default();
        let settings = config_crate::Config::builder()
            .set_default("listen_address", defaults.listen_address)?
            .set_default("upload_dir", defaults.upload_dir.to_string_lossy().to_string())?
            .set_default("output_file", defaults.output_file.to_string_lossy().to_string())?
            .set_default("target_alarm_id", defaults.target_alarm_id)?
            .set_default("min_duration_minutes", defaults.min_duration_minutes)?
            .set_default("window_minutes", defaults.window_minutes)?
            .set_default("max_upload_bytes", defaults.max_upload_bytes as i64)?
            .add_source(config_crate::File::with_name("config").required(false))
            .add_source(
                config_crate::Environment::with_prefix("ALARM")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        let mut config: Config = settings.try_deserialize()?;

        if let Ok(port) = std::env::var("PORT") {
            config.listen_address = with_port(&config.listen_address, &port);
        }

        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.window_minutes > 0.0) {
            return Err("window_minutes deve ser maior que zero".into());
        }
        if !(self.min_duration_minutes >= 0.0) {
            return Err("min_duration_minutes não pode ser negativo".into());
        }
        if self.upload_dir.as_os_str().is_empty() {
            return Err("upload_dir não pode ser vazio".into());
        }
        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes deve ser maior que zero".into());
        }
        Ok(())
    }

    pub fn policy(&self) -> AvailabilityPolicy {
        AvailabilityPolicy {
            target_alarm_id: self.target_alarm_id,
            min_duration_minutes: self.min_duration_minutes,
            window_minutes: self.window_minutes,
        }
    }
}

fn with_port(address: &str, port: &str) -> String {
    match address.rsplit_once(':') {
        Some((host, _)) => format!("{host}:{port}"),
        None => format!("{address}:{port}"),
    }
}
