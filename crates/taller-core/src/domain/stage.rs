//! Pipeline stages for the repair workflow.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One discrete state in the repair pipeline.
///
/// Stage transitions:
/// - Received -> InRepair (evaluation found a fault)
/// - Received -> ReadyDelivery (no repair needed)
/// - InRepair -> QualityCheck
/// - QualityCheck -> ReadyDelivery (approved)
/// - QualityCheck -> InRepair (rejected, back to the bench)
/// - ReadyDelivery -> released (confirmed delivery)
///
/// `UnderEvaluation` is display-only: no transition targets it, so
/// its queue stays permanently empty.
///
/// Design note: the derived `Ord` follows declaration order, which is
/// the pipeline enumeration order every listing operation uses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Received,
    UnderEvaluation,
    InRepair,
    QualityCheck,
    ReadyDelivery,
}

impl Stage {
    /// All stages in pipeline enumeration order.
    pub const ALL: [Stage; 5] = [
        Stage::Received,
        Stage::UnderEvaluation,
        Stage::InRepair,
        Stage::QualityCheck,
        Stage::ReadyDelivery,
    ];

    /// Operator-facing label, kept identical to the historical data
    /// files so old ledgers and new ones read the same.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Received => "📥 Recibido",
            Stage::UnderEvaluation => "🔍 En Evaluación",
            Stage::InRepair => "🛠️ En Reparación",
            Stage::QualityCheck => "✅ Control de Calidad",
            Stage::ReadyDelivery => "📦 Listo para Entrega",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
