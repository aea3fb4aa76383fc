//! The workflow state machine: one FIFO queue per pipeline stage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Device, Stage, WorkflowError};
use crate::queue::StageQueue;

/// Outcome of a delivery attempt.
#[derive(Debug, PartialEq)]
pub enum Delivery {
    /// The operator confirmed: the workflow released the device.
    Completed(Device),
    /// The operator cancelled: the device went back to the tail of
    /// `ReadyDelivery`. No activity is recorded.
    Returned,
}

/// Ownership root for all live devices.
///
/// Design:
/// - One `StageQueue` per `Stage`, always, even for the display-only
///   `UnderEvaluation` stage.
/// - Identifier uniqueness (case-insensitive) holds across the union
///   of all queues; `admit` is the only entry point and enforces it.
/// - Devices leave the workflow on confirmed delivery or deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    queues: BTreeMap<Stage, StageQueue>,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    pub fn new() -> Self {
        let queues = Stage::ALL
            .iter()
            .map(|&stage| (stage, StageQueue::new(stage)))
            .collect();
        Self { queues }
    }

    /// Re-create any queue a hand-edited or truncated snapshot lacks.
    pub(crate) fn restore_missing_queues(&mut self) {
        for stage in Stage::ALL {
            self.queues
                .entry(stage)
                .or_insert_with(|| StageQueue::new(stage));
        }
    }

    pub fn queue(&self, stage: Stage) -> &StageQueue {
        &self.queues[&stage]
    }

    fn queue_mut(&mut self, stage: Stage) -> &mut StageQueue {
        self.queues.get_mut(&stage).expect("one queue per stage")
    }

    /// Admit a new device into `Received`.
    ///
    /// Fails with `DuplicateIdentifier` (and mutates nothing) when any
    /// live device already carries the identifier, in any case.
    pub fn admit(&mut self, device: Device) -> Result<&Device, WorkflowError> {
        if self.find_by_identifier(device.identifier()).is_some() {
            return Err(WorkflowError::DuplicateIdentifier(
                device.identifier().to_string(),
            ));
        }
        let received = self.queue_mut(Stage::Received);
        received.enqueue(device);
        Ok(received.tail().expect("just enqueued"))
    }

    /// Evaluate the next received device and route it.
    ///
    /// The evaluation activity is recorded before the move, so it
    /// carries the `Received` stage; the routing activity carries the
    /// destination stage.
    pub fn advance_from_received(
        &mut self,
        analysis: &str,
        requires_repair: bool,
    ) -> Result<&Device, WorkflowError> {
        let mut device = self.queue_mut(Stage::Received).dequeue()?;
        device.set_technical_analysis(analysis);
        device.record_activity(format!("Evaluación técnica realizada: {analysis}"));

        let destination = if requires_repair {
            Stage::InRepair
        } else {
            Stage::ReadyDelivery
        };
        let queue = self.queue_mut(destination);
        queue.enqueue(device);

        let device = queue.tail_mut().expect("just enqueued");
        device.record_activity(if requires_repair {
            "Enviado a reparación"
        } else {
            "No requiere reparación. Listo para entrega"
        });
        Ok(device)
    }

    /// Complete the repair of the next device on the bench and send it
    /// to quality check.
    pub fn advance_from_repair(
        &mut self,
        repair: &str,
        technician: &str,
    ) -> Result<&Device, WorkflowError> {
        let mut device = self.queue_mut(Stage::InRepair).dequeue()?;
        device.set_repair_work(repair);
        device.set_technician_id(technician);
        device.record_activity(format!("Reparación completada por {technician}: {repair}"));

        let queue = self.queue_mut(Stage::QualityCheck);
        queue.enqueue(device);
        Ok(queue.tail().expect("just enqueued"))
    }

    /// Verify the next device in quality check: approved devices move
    /// to delivery, rejected ones loop back to repair.
    pub fn advance_from_quality(&mut self, approved: bool) -> Result<&Device, WorkflowError> {
        let device = self.queue_mut(Stage::QualityCheck).dequeue()?;

        let destination = if approved {
            Stage::ReadyDelivery
        } else {
            Stage::InRepair
        };
        let queue = self.queue_mut(destination);
        queue.enqueue(device);

        let device = queue.tail_mut().expect("just enqueued");
        device.record_activity(if approved {
            "Aprobado en control de calidad. Listo para entrega"
        } else {
            "Rechazado en control de calidad. Regresado a reparación"
        });
        Ok(device)
    }

    /// Hand the next ready device to its owner, or put it back at the
    /// tail when the operator cancels the confirmation.
    pub fn deliver(&mut self, confirmed: bool) -> Result<Delivery, WorkflowError> {
        let mut device = self.queue_mut(Stage::ReadyDelivery).dequeue()?;
        if confirmed {
            device.record_activity("Equipo entregado al cliente");
            Ok(Delivery::Completed(device))
        } else {
            self.queue_mut(Stage::ReadyDelivery).enqueue(device);
            Ok(Delivery::Returned)
        }
    }

    /// Case-insensitive lookup, scanning stages in enumeration order.
    pub fn find_by_identifier(&self, id: &str) -> Option<&Device> {
        Stage::ALL
            .iter()
            .flat_map(|&stage| self.queue(stage).iter())
            .find(|device| device.matches_identifier(id))
    }

    /// Remove a device from whichever stage holds it. Writes nothing
    /// to the device's activity log; it simply leaves the workflow.
    pub fn delete_by_identifier(&mut self, id: &str) -> Result<Device, WorkflowError> {
        for stage in Stage::ALL {
            if self.queue(stage).contains_identifier(id) {
                return self.queue_mut(stage).remove_by_identifier(id);
            }
        }
        Err(WorkflowError::NotFound(id.to_string()))
    }

    /// Every queue in stage enumeration order.
    pub fn list_by_stage(&self) -> impl Iterator<Item = (Stage, &StageQueue)> {
        Stage::ALL.iter().map(|&stage| (stage, self.queue(stage)))
    }

    pub fn device_count(&self) -> usize {
        Stage::ALL.iter().map(|&stage| self.queue(stage).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.device_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

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

    fn descriptions(device: &Device) -> Vec<&str> {
        device
            .activity_log()
            .iter()
            .map(|r| r.description())
            .collect()
    }

    #[test]
    fn stage_always_matches_holding_queue() {
        let mut workflow = Workflow::new();
        workflow.admit(device("SN-1")).unwrap();
        workflow.admit(device("SN-2")).unwrap();
        workflow.advance_from_received("placa quemada", true).unwrap();

        for (stage, queue) in workflow.list_by_stage() {
            for device in queue.iter() {
                assert_eq!(device.current_stage(), stage);
            }
        }
    }

    #[test]
    fn duplicate_identifier_is_rejected_case_insensitively() {
        let mut workflow = Workflow::new();
        workflow.admit(device("SN-3")).unwrap();

        let err = workflow.admit(device("sn-3")).unwrap_err();
        assert!(matches!(err, WorkflowError::DuplicateIdentifier(id) if id == "sn-3"));
        assert_eq!(workflow.device_count(), 1);
    }

    #[rstest]
    #[case::repair_needed(true, Stage::InRepair, "Enviado a reparación")]
    #[case::no_repair(false, Stage::ReadyDelivery, "No requiere reparación. Listo para entrega")]
    fn evaluation_routes_by_repair_flag(
        #[case] requires_repair: bool,
        #[case] destination: Stage,
        #[case] routing_activity: &str,
    ) {
        let mut workflow = Workflow::new();
        workflow.admit(device("SN-1")).unwrap();

        let moved = workflow
            .advance_from_received("revisión general", requires_repair)
            .unwrap();
        assert_eq!(moved.current_stage(), destination);
        assert_eq!(moved.technical_analysis(), Some("revisión general"));

        let log = descriptions(moved);
        assert_eq!(log[1], "Evaluación técnica realizada: revisión general");
        assert_eq!(log[2], routing_activity);

        assert!(workflow.queue(Stage::Received).is_empty());
        assert_eq!(workflow.queue(destination).len(), 1);
    }

    #[test]
    fn evaluation_activity_is_stamped_before_the_move() {
        let mut workflow = Workflow::new();
        workflow.admit(device("SN-1")).unwrap();
        let moved = workflow.advance_from_received("placa quemada", true).unwrap();

        let log = moved.activity_log();
        assert_eq!(log[1].stage(), Stage::Received);
        assert_eq!(log[2].stage(), Stage::InRepair);
    }

    #[test]
    fn happy_path_with_repair_empties_the_workflow() {
        let mut workflow = Workflow::new();
        workflow.admit(device("SN-1")).unwrap();
        workflow.advance_from_received("placa quemada", true).unwrap();
        workflow
            .advance_from_repair("reemplazo de placa", "T7")
            .unwrap();
        workflow.advance_from_quality(true).unwrap();

        let Delivery::Completed(released) = workflow.deliver(true).unwrap() else {
            panic!("expected a completed delivery");
        };

        assert!(workflow.is_empty());
        assert_eq!(released.repair_work(), Some("reemplazo de placa"));
        assert_eq!(released.technician_id(), Some("T7"));
        assert_eq!(
            descriptions(&released),
            vec![
                "Equipo recibido en el sistema: no enciende",
                "Evaluación técnica realizada: placa quemada",
                "Enviado a reparación",
                "Reparación completada por T7: reemplazo de placa",
                "Aprobado en control de calidad. Listo para entrega",
                "Equipo entregado al cliente",
            ]
        );
    }

    #[test]
    fn skip_repair_bypasses_bench_and_quality() {
        let mut workflow = Workflow::new();
        workflow.admit(device("SN-2")).unwrap();
        workflow.advance_from_received("limpieza", false).unwrap();

        assert!(workflow.queue(Stage::InRepair).is_empty());
        assert!(workflow.queue(Stage::QualityCheck).is_empty());

        let Delivery::Completed(released) = workflow.deliver(true).unwrap() else {
            panic!("expected a completed delivery");
        };
        let log = descriptions(&released);
        assert_eq!(log[2], "No requiere reparación. Listo para entrega");
        assert_eq!(log[3], "Equipo entregado al cliente");
    }

    #[test]
    fn quality_rejection_loops_back_to_repair() {
        let mut workflow = Workflow::new();
        workflow.admit(device("SN-1")).unwrap();
        workflow.advance_from_received("placa quemada", true).unwrap();
        workflow
            .advance_from_repair("reemplazo de placa", "T7")
            .unwrap();

        let rejected = workflow.advance_from_quality(false).unwrap();
        assert_eq!(rejected.current_stage(), Stage::InRepair);

        workflow.advance_from_repair("resoldadura", "T7").unwrap();
        workflow.advance_from_quality(true).unwrap();
        assert!(matches!(
            workflow.deliver(true).unwrap(),
            Delivery::Completed(_)
        ));
        assert!(workflow.is_empty());
    }

    #[test]
    fn rejection_is_logged_between_the_two_repairs() {
        let mut workflow = Workflow::new();
        workflow.admit(device("SN-1")).unwrap();
        workflow.advance_from_received("placa quemada", true).unwrap();
        workflow.advance_from_repair("primer intento", "T7").unwrap();
        workflow.advance_from_quality(false).unwrap();
        let repaired = workflow
            .advance_from_repair("segundo intento", "T7")
            .unwrap();

        let log = descriptions(repaired);
        let first = log
            .iter()
            .position(|d| d.starts_with("Reparación completada por T7: primer"))
            .unwrap();
        let rejection = log
            .iter()
            .position(|d| *d == "Rechazado en control de calidad. Regresado a reparación")
            .unwrap();
        let second = log
            .iter()
            .position(|d| d.starts_with("Reparación completada por T7: segundo"))
            .unwrap();
        assert!(first < rejection && rejection < second);
    }

    #[test]
    fn cancelled_delivery_returns_device_to_the_tail() {
        let mut workflow = Workflow::new();
        workflow.admit(device("SN-4")).unwrap();
        workflow.admit(device("SN-5")).unwrap();
        workflow.advance_from_received("limpieza", false).unwrap();
        workflow.advance_from_received("limpieza", false).unwrap();

        let log_before = workflow
            .queue(Stage::ReadyDelivery)
            .peek()
            .unwrap()
            .activity_log()
            .len();

        assert_eq!(workflow.deliver(false).unwrap(), Delivery::Returned);

        let delivery: Vec<_> = workflow
            .queue(Stage::ReadyDelivery)
            .iter()
            .map(|d| d.identifier().to_string())
            .collect();
        assert_eq!(delivery, ["SN-5", "SN-4"]);

        let returned = workflow.queue(Stage::ReadyDelivery).tail().unwrap();
        assert_eq!(returned.activity_log().len(), log_before);
    }

    #[rstest]
    #[case::received(Stage::Received)]
    #[case::in_repair(Stage::InRepair)]
    #[case::quality(Stage::QualityCheck)]
    #[case::delivery(Stage::ReadyDelivery)]
    fn advancing_an_empty_stage_fails_and_mutates_nothing(#[case] stage: Stage) {
        let mut workflow = Workflow::new();
        let result = match stage {
            Stage::Received => workflow.advance_from_received("x", true).map(|_| ()),
            Stage::InRepair => workflow.advance_from_repair("x", "T1").map(|_| ()),
            Stage::QualityCheck => workflow.advance_from_quality(true).map(|_| ()),
            Stage::ReadyDelivery => workflow.deliver(true).map(|_| ()),
            Stage::UnderEvaluation => unreachable!("no transition reads this stage"),
        };
        assert!(matches!(result.unwrap_err(), WorkflowError::QueueEmpty(s) if s == stage));
        assert!(workflow.is_empty());
    }

    #[test]
    fn delete_removes_from_whichever_stage_holds_the_device() {
        let mut workflow = Workflow::new();
        workflow.admit(device("SN-1")).unwrap();
        workflow.admit(device("SN-2")).unwrap();
        workflow.advance_from_received("placa quemada", true).unwrap();

        let removed = workflow.delete_by_identifier("sn-1").unwrap();
        assert_eq!(removed.identifier(), "SN-1");
        assert_eq!(workflow.device_count(), 1);

        let err = workflow.delete_by_identifier("SN-1").unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(_)));
    }

    #[test]
    fn find_scans_all_stages() {
        let mut workflow = Workflow::new();
        workflow.admit(device("SN-1")).unwrap();
        workflow.admit(device("SN-2")).unwrap();
        workflow.advance_from_received("placa quemada", true).unwrap();

        assert_eq!(
            workflow.find_by_identifier("SN-1").unwrap().current_stage(),
            Stage::InRepair
        );
        assert_eq!(
            workflow.find_by_identifier("sn-2").unwrap().current_stage(),
            Stage::Received
        );
        assert!(workflow.find_by_identifier("SN-9").is_none());
    }

    #[test]
    fn under_evaluation_queue_exists_but_stays_empty() {
        let mut workflow = Workflow::new();
        workflow.admit(device("SN-1")).unwrap();
        workflow.advance_from_received("placa quemada", true).unwrap();
        workflow.advance_from_repair("reemplazo", "T7").unwrap();
        workflow.advance_from_quality(false).unwrap();

        assert!(workflow.queue(Stage::UnderEvaluation).is_empty());
    }
}
