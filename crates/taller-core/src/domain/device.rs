//! Device record: one physical unit plus its accumulated activity.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{ActivityRecord, Stage};

/// A physical device moving through the repair pipeline.
///
/// Design:
/// - Identity and contact fields are fixed at creation; only the work
///   fields (analysis, repair, technician) and the stage mutate.
/// - Every mutation goes through a method so the activity log stays
///   in step with the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    identifier: String,
    issue_description: String,
    entry_date: NaiveDate,
    owner_name: String,
    owner_email: String,
    owner_phone: String,

    current_stage: Stage,
    technical_analysis: Option<String>,
    repair_work: Option<String>,
    technician_id: Option<String>,

    activity_log: Vec<ActivityRecord>,
}

impl Device {
    /// Register a new device at reception.
    ///
    /// The log starts with a reception record, so it is never empty.
    pub fn new(
        identifier: impl Into<String>,
        issue_description: impl Into<String>,
        entry_date: NaiveDate,
        owner_name: impl Into<String>,
        owner_email: impl Into<String>,
        owner_phone: impl Into<String>,
    ) -> Self {
        let issue_description = issue_description.into();
        let mut device = Self {
            identifier: identifier.into(),
            issue_description: issue_description.clone(),
            entry_date,
            owner_name: owner_name.into(),
            owner_email: owner_email.into(),
            owner_phone: owner_phone.into(),
            current_stage: Stage::Received,
            technical_analysis: None,
            repair_work: None,
            technician_id: None,
            activity_log: Vec::new(),
        };
        device.record_activity(format!(
            "Equipo recibido en el sistema: {issue_description}"
        ));
        device
    }

    /// Append an activity dated today, stamped with the current stage.
    pub fn record_activity(&mut self, description: impl Into<String>) {
        self.activity_log.push(ActivityRecord::new(
            Local::now().date_naive(),
            description,
            self.current_stage,
        ));
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Case-insensitive identifier comparison, the one equality the
    /// workflow uses for uniqueness and lookups.
    pub fn matches_identifier(&self, id: &str) -> bool {
        self.identifier.to_lowercase() == id.to_lowercase()
    }

    pub fn issue_description(&self) -> &str {
        &self.issue_description
    }

    pub fn entry_date(&self) -> NaiveDate {
        self.entry_date
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn owner_email(&self) -> &str {
        &self.owner_email
    }

    pub fn owner_phone(&self) -> &str {
        &self.owner_phone
    }

    pub fn current_stage(&self) -> Stage {
        self.current_stage
    }

    /// Called by the holding queue when the device changes hands.
    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.current_stage = stage;
    }

    pub fn technical_analysis(&self) -> Option<&str> {
        self.technical_analysis.as_deref()
    }

    pub fn set_technical_analysis(&mut self, analysis: impl Into<String>) {
        self.technical_analysis = Some(analysis.into());
    }

    pub fn repair_work(&self) -> Option<&str> {
        self.repair_work.as_deref()
    }

    pub fn set_repair_work(&mut self, work: impl Into<String>) {
        self.repair_work = Some(work.into());
    }

    pub fn technician_id(&self) -> Option<&str> {
        self.technician_id.as_deref()
    }

    pub fn set_technician_id(&mut self, technician: impl Into<String>) {
        self.technician_id = Some(technician.into());
    }

    pub fn activity_log(&self) -> &[ActivityRecord] {
        &self.activity_log
    }

    /// Short multi-line card shown before stage prompts.
    pub fn summary(&self) -> String {
        format!(
            "🔢 Número de serie: {}\n\
             👤 Propietario: {}\n\
             📊 Estado actual: {}\n\
             📅 Fecha de ingreso: {}\n\
             🔧 Descripción del problema: {}\n\
             📞 Contacto: {} / {}",
            self.identifier,
            self.owner_name,
            self.current_stage,
            self.entry_date,
            self.issue_description,
            self.owner_email,
            self.owner_phone,
        )
    }

    /// Summary plus work fields and the whole activity log.
    pub fn full_details(&self) -> String {
        let mut details = self.summary();
        details.push('\n');

        if let Some(analysis) = &self.technical_analysis {
            details.push_str(&format!("🔍 Análisis técnico: {analysis}\n"));
        }
        if let Some(work) = &self.repair_work {
            details.push_str(&format!("🛠️ Trabajo realizado: {work}\n"));
            if let Some(technician) = &self.technician_id {
                details.push_str(&format!("👨‍🔧 Técnico asignado: {technician}\n"));
            }
        }

        details.push_str("\n📜 Registro de actividades:\n");
        for record in &self.activity_log {
            details.push_str(&format!("   {record}\n"));
        }
        details
    }
}
