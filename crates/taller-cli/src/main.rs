//! taller: interactive console for the repair-shop workflow.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::Term;
use taller_core::RepairService;
use tracing_subscriber::EnvFilter;

mod prompts;
mod screens;

#[derive(Debug, Parser)]
#[command(name = "taller", about = "Sistema de soporte técnico computacional")]
struct Cli {
    /// Directory holding the snapshot and the history ledger.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    std::fs::create_dir_all(&cli.data_dir)
        .with_context(|| format!("no se pudo crear el directorio {}", cli.data_dir.display()))?;
    let mut service = RepairService::open(&cli.data_dir);

    let term = Term::stdout();
    loop {
        let _ = term.clear_screen();
        print_menu();

        let outcome = match prompts::menu_choice()? {
            1 => {
                screens::queue_status(&service);
                Ok(())
            }
            2 => screens::register_device(&mut service),
            3 => screens::evaluation(&mut service),
            4 => {
                screens::history(&service);
                Ok(())
            }
            5 => screens::repair(&mut service),
            6 => screens::quality(&mut service),
            7 => screens::delivery(&mut service),
            8 => screens::delete_record(&mut service),
            0 => {
                // A failed final save must not look like a clean exit.
                service
                    .save()
                    .context("no se pudo guardar el estado del sistema")?;
                println!("╔════════════════════════════════════════╗");
                println!("║     Sistema cerrado exitosamente       ║");
                println!("╚════════════════════════════════════════╝");
                return Ok(());
            }
            _ => {
                println!("❌ Selección inválida. Intente nuevamente.");
                Ok(())
            }
        };
        if let Err(e) = outcome {
            println!("❌ Error inesperado: {e}");
        }
        prompts::pause()?;
    }
}

fn print_menu() {
    println!("╔══════════════════════════════════════════════════╗");
    println!("║          🔧 SISTEMA DE SOPORTE TÉCNICO           ║");
    println!("╠══════════════════════════════════════════════════╣");
    println!("║  1 ► Consultar estado de colas                   ║");
    println!("║  2 ► Ingresar nuevo equipo                       ║");
    println!("║  3 ► Realizar evaluación técnica                 ║");
    println!("║  4 ► Ver registro histórico                      ║");
    println!("║  5 ► Procesar reparación                         ║");
    println!("║  6 ► Control de calidad                          ║");
    println!("║  7 ► Gestionar entrega                           ║");
    println!("║  8 ► Eliminar registro                           ║");
    println!("║  0 ► Cerrar sistema                              ║");
    println!("╚══════════════════════════════════════════════════╝");
}
