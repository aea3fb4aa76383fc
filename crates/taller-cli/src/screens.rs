//! One screen per operator command.
//!
//! Screens are thin: they show the device at the head of the relevant
//! queue, collect validated inputs, call one service operation, and
//! translate errors into operator-facing messages. Nothing here
//! mutates the workflow directly.

use anyhow::Result;
use console::style;
use taller_core::{Device, RepairService, Stage, WorkflowError};

use crate::prompts;

fn section(title: &str) {
    println!("┌─────────────────────────────────────┐");
    println!("│    {}", style(title).bold());
    println!("└─────────────────────────────────────┘");
}

fn report(error: &WorkflowError) {
    match error {
        WorkflowError::Persistence { .. } => println!("❌ Error al persistir datos: {error}"),
        _ => println!("❌ Error: {error}"),
    }
}

pub fn queue_status(service: &RepairService) {
    section("📊 ESTADO DE COLAS");
    for (stage, queue) in service.list_by_stage() {
        println!("\n🔸 {} ({} equipos):", stage, queue.len());
        if queue.is_empty() {
            println!("   └─ No hay equipos en esta cola.");
        } else {
            for (position, device) in queue.iter().enumerate() {
                println!(
                    "   {}. {} - {}",
                    position + 1,
                    device.identifier(),
                    device.owner_name()
                );
            }
        }
    }
}

pub fn register_device(service: &mut RepairService) -> Result<()> {
    section("📋 REGISTRO DE NUEVO EQUIPO");
    loop {
        let identifier = prompts::non_empty("Número de serie del equipo")?;
        if service.find_device(&identifier).is_some() {
            println!("⚠️  Ya existe un equipo con ese número de serie.");
            if !prompts::yes_no("¿Desea intentar con otro número?")? {
                return Ok(());
            }
            continue;
        }

        let issue = prompts::non_empty("Descripción del problema")?;
        let entry_date = prompts::date("Fecha de ingreso (YYYY-MM-DD)")?;
        let owner = prompts::non_empty("Nombre del propietario")?;
        let email = prompts::email("Correo electrónico")?;
        let phone = prompts::phone("Número telefónico (8 dígitos)")?;

        let device = Device::new(identifier, issue, entry_date, owner, email, phone);
        match service.admit(device) {
            Ok(()) => {
                println!("✅ Equipo registrado correctamente.");
                return Ok(());
            }
            Err(WorkflowError::DuplicateIdentifier(_)) => {
                println!("⚠️  Ya existe un equipo con ese número de serie.");
                if !prompts::yes_no("¿Desea intentar nuevamente?")? {
                    return Ok(());
                }
            }
            Err(e) => {
                report(&e);
                return Ok(());
            }
        }
    }
}

pub fn evaluation(service: &mut RepairService) -> Result<()> {
    section("🔍 EVALUACIÓN TÉCNICA");
    let Some(device) = service.next_in(Stage::Received) else {
        println!("ℹ️  No hay equipos pendientes de evaluación.");
        return Ok(());
    };
    println!("🔧 Evaluando: {}", device.identifier());
    println!("\n📋 Información del equipo:\n{}", device.summary());

    let analysis = prompts::non_empty("Ingrese el análisis técnico")?;
    let requires_repair = prompts::yes_no("¿El equipo requiere reparación?")?;

    match service.advance_from_received(&analysis, requires_repair) {
        Ok(()) if requires_repair => println!("📤 Equipo enviado a cola de reparación."),
        Ok(()) => println!("📤 Equipo enviado directamente a entrega."),
        Err(e) => report(&e),
    }
    Ok(())
}

pub fn repair(service: &mut RepairService) -> Result<()> {
    section("🛠️  PROCESO DE REPARACIÓN");
    let Some(device) = service.next_in(Stage::InRepair) else {
        println!("ℹ️  No hay equipos en reparación.");
        return Ok(());
    };
    println!("🔧 Reparando: {}", device.identifier());
    println!("\n📋 Información del equipo:\n{}", device.summary());
    if let Some(analysis) = device.technical_analysis() {
        println!("🔍 Análisis: {analysis}");
    }

    let work = prompts::non_empty("Detalles del trabajo realizado")?;
    let technician = prompts::non_empty("Identificación del técnico")?;

    match service.advance_from_repair(&work, &technician) {
        Ok(()) => println!("✅ Equipo enviado a control de calidad."),
        Err(e) => report(&e),
    }
    Ok(())
}

pub fn quality(service: &mut RepairService) -> Result<()> {
    section("✅ CONTROL DE CALIDAD");
    let Some(device) = service.next_in(Stage::QualityCheck) else {
        println!("ℹ️  No hay equipos en control de calidad.");
        return Ok(());
    };
    println!("🔍 Verificando: {}", device.identifier());
    println!("\n📋 Información del equipo:\n{}", device.summary());
    if let Some(analysis) = device.technical_analysis() {
        println!("🔍 Análisis: {analysis}");
    }
    if let Some(work) = device.repair_work() {
        println!("🛠️  Reparación: {work}");
    }
    if let Some(technician) = device.technician_id() {
        println!("👨‍🔧 Técnico: {technician}");
    }

    let approved = prompts::yes_no("¿El trabajo cumple con los estándares de calidad?")?;

    match service.advance_from_quality(approved) {
        Ok(()) if approved => println!("✅ Equipo aprobado y enviado a entrega."),
        Ok(()) => println!("❌ Equipo regresado a reparación."),
        Err(e) => report(&e),
    }
    Ok(())
}

pub fn delivery(service: &mut RepairService) -> Result<()> {
    section("📦 GESTIÓN DE ENTREGA");
    let Some(device) = service.next_in(Stage::ReadyDelivery) else {
        println!("ℹ️  No hay equipos listos para entrega.");
        return Ok(());
    };
    println!("📦 Procesando entrega: {}", device.identifier());
    println!(
        "\n📋 Información completa del servicio:\n{}",
        device.full_details()
    );

    let confirmed = prompts::yes_no("¿Confirmar entrega al cliente?")?;

    match service.deliver(confirmed) {
        Ok(Some(released)) => println!("✅ Entrega confirmada para: {}", released.identifier()),
        Ok(None) => println!("❌ Entrega cancelada. Equipo regresado a cola de entrega."),
        Err(e) => report(&e),
    }
    Ok(())
}

pub fn delete_record(service: &mut RepairService) -> Result<()> {
    section("🗑️  ELIMINAR REGISTRO");
    loop {
        let identifier = prompts::non_empty("Número de serie del equipo a eliminar")?;
        let Some(device) = service.find_device(&identifier) else {
            println!("❌ No se encontró equipo con número de serie: {identifier}");
            if !prompts::yes_no("¿Desea intentar con otro número?")? {
                return Ok(());
            }
            continue;
        };
        println!("\n📋 Información del equipo a eliminar:\n{}", device.summary());

        if prompts::yes_no("¿Confirmar eliminación?")? {
            match service.delete_by_identifier(&identifier) {
                Ok(removed) => println!("✅ Equipo eliminado: {}", removed.identifier()),
                Err(e) => report(&e),
            }
        } else {
            println!("❌ Operación cancelada.");
        }
        return Ok(());
    }
}

pub fn history(service: &RepairService) {
    section("📜 REGISTRO HISTÓRICO");
    println!("{}", service.read_history());
}
