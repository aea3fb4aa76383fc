//! History log: the append-only service ledger.

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::{Device, WorkflowError};

const SEPARATOR: &str = "═══════════════════════════════════════════════";
const HEADING: &str = "📚 HISTORIAL COMPLETO DEL SISTEMA";
const NO_RECORDS: &str = "📝 No se encontraron registros históricos en el sistema.\n\
                          💡 Los registros aparecerán aquí cuando se procesen dispositivos.";
const EMPTY_LOG: &str = "📝 El historial está vacío.\n\
                         💡 Los registros aparecerán aquí cuando se procesen dispositivos.";

/// Append-only text ledger of device events.
///
/// The ledger outlives the workflow: it keeps records of devices that
/// were delivered long ago. It never shrinks during normal operation.
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record describing the device as it is right now.
    ///
    /// The record is bracketed by separator lines, terminated by a
    /// blank line, and flushed before returning.
    pub fn append(&self, device: &Device) -> Result<(), WorkflowError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| WorkflowError::persistence(&self.path, e))?;

        let mut writer = BufWriter::new(file);
        self.write_record(&mut writer, device)
            .and_then(|()| writer.flush())
            .map_err(|e| WorkflowError::persistence(&self.path, e))
    }

    fn write_record(&self, w: &mut impl Write, device: &Device) -> io::Result<()> {
        writeln!(w, "{SEPARATOR}")?;
        writeln!(w, "🏷️ Identificador: {}", device.identifier())?;
        writeln!(w, "📊 Estado Actual: {}", device.current_stage())?;
        writeln!(w, "👤 Propietario: {}", device.owner_name())?;
        writeln!(
            w,
            "📅 Fecha de Registro: {}",
            Local::now().format("%Y-%m-%dT%H:%M:%S%.3f")
        )?;

        if let Some(analysis) = device.technical_analysis() {
            writeln!(w, "🔍 Diagnóstico: {analysis}")?;
        }
        if let Some(work) = device.repair_work() {
            writeln!(w, "🛠️ Intervención: {work}")?;
            if let Some(technician) = device.technician_id() {
                writeln!(w, "👨‍🔧 Especialista: {technician}")?;
            }
        }

        writeln!(w, "📝 Registro de Actividades:")?;
        for record in device.activity_log() {
            writeln!(w, "    ↳ {record}")?;
        }

        writeln!(w, "{SEPARATOR}")?;
        writeln!(w)
    }

    /// The whole ledger under a heading, or a fixed message when the
    /// ledger is absent or effectively empty.
    pub fn read_all(&self) -> String {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return NO_RECORDS.to_string(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "history unreadable");
                return NO_RECORDS.to_string();
            }
        };

        if content.trim().is_empty() {
            return EMPTY_LOG.to_string();
        }

        format!("{HEADING}\n{}\n\n{content}", "═".repeat(50))
    }

    /// Write the `read_all` rendering to another file, for hand-off
    /// reports.
    pub fn export_to(&self, path: impl AsRef<Path>) -> Result<(), WorkflowError> {
        let path = path.as_ref();
        fs::write(path, self.read_all()).map_err(|e| WorkflowError::persistence(path, e))
    }

    /// Number of records currently in the ledger.
    pub fn record_count(&self) -> usize {
        match fs::read_to_string(&self.path) {
            Ok(content) => content.lines().filter(|l| *l == SEPARATOR).count() / 2,
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn device(id: &str) -> Device {
        Device::new(
            id,
            "no enciende",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            "Ana",
            "a@x",
            "22223333",
        )
    }

    #[test]
    fn append_writes_one_bracketed_record() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("records.log"));

        log.append(&device("SN-1")).unwrap();

        assert_eq!(log.record_count(), 1);
        let content = fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("🏷️ Identificador: SN-1"));
        assert!(content.contains("📊 Estado Actual: 📥 Recibido"));
        assert!(content.contains("👤 Propietario: Ana"));
        assert!(content.contains("    ↳ 📅"));
        assert!(content.ends_with("\n\n"));
    }

    #[test]
    fn records_accumulate_in_append_order() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("records.log"));

        log.append(&device("SN-1")).unwrap();
        log.append(&device("SN-2")).unwrap();

        assert_eq!(log.record_count(), 2);
        let content = fs::read_to_string(log.path()).unwrap();
        let first = content.find("SN-1").unwrap();
        let second = content.find("SN-2").unwrap();
        assert!(first < second);
    }

    #[test]
    fn work_fields_appear_only_when_present() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("records.log"));

        let mut unit = device("SN-1");
        log.append(&unit).unwrap();

        unit.set_technical_analysis("placa quemada");
        unit.set_repair_work("reemplazo de placa");
        unit.set_technician_id("T7");
        log.append(&unit).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        let records: Vec<&str> = content.split("🏷️ Identificador").collect();
        assert!(!records[1].contains("🔍 Diagnóstico"));
        assert!(records[2].contains("🔍 Diagnóstico: placa quemada"));
        assert!(records[2].contains("🛠️ Intervención: reemplazo de placa"));
        assert!(records[2].contains("👨‍🔧 Especialista: T7"));
    }

    #[test]
    fn read_all_prepends_the_heading() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("records.log"));
        log.append(&device("SN-1")).unwrap();

        let rendered = log.read_all();
        assert!(rendered.starts_with(HEADING));
        assert!(rendered.contains("SN-1"));
    }

    #[test]
    fn absent_ledger_reads_as_no_records() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("records.log"));
        assert_eq!(log.read_all(), NO_RECORDS);
        assert_eq!(log.record_count(), 0);
    }

    #[test]
    fn blank_ledger_reads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.log");
        fs::write(&path, "\n  \n").unwrap();
        assert_eq!(HistoryLog::new(path).read_all(), EMPTY_LOG);
    }

    #[test]
    fn export_reproduces_the_rendering() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("records.log"));
        log.append(&device("SN-1")).unwrap();

        let out = dir.path().join("export.txt");
        log.export_to(&out).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), log.read_all());
    }
}
