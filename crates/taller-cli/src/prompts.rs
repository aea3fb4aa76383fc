//! Operator input collection and validation.
//!
//! All syntactic validation lives here, before anything reaches the
//! workflow engine: non-empty strings, email and phone shapes, ISO
//! dates, and S/N answers.

use std::sync::LazyLock;

use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::Input;
use regex::Regex;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+_.-]+@(.+)$").expect("valid pattern"));
static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{8}$").expect("valid pattern"));

pub fn non_empty(prompt: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("este campo no puede estar vacío")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(value.trim().to_string())
}

pub fn email(prompt: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), &str> {
            if EMAIL.is_match(input.trim()) {
                Ok(())
            } else {
                Err("formato de correo electrónico inválido")
            }
        })
        .interact_text()?;
    Ok(value.trim().to_string())
}

pub fn phone(prompt: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), &str> {
            if PHONE.is_match(input.trim()) {
                Ok(())
            } else {
                Err("el teléfono debe tener exactamente 8 dígitos numéricos")
            }
        })
        .interact_text()?;
    Ok(value.trim().to_string())
}

pub fn date(prompt: &str) -> Result<NaiveDate> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), &str> {
            NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| "formato de fecha incorrecto, use YYYY-MM-DD")
        })
        .interact_text()?;
    Ok(NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").expect("validated above"))
}

/// S/N question, case-insensitive; anything else re-prompts.
pub fn yes_no(prompt: &str) -> Result<bool> {
    loop {
        let answer: String = Input::new()
            .with_prompt(format!("{prompt} (S/N)"))
            .interact_text()?;
        match answer.trim().to_uppercase().as_str() {
            "S" => return Ok(true),
            "N" => return Ok(false),
            _ => println!("❌ Respuesta inválida. Ingrese S o N."),
        }
    }
}

pub fn menu_choice() -> Result<u32> {
    loop {
        let value: String = Input::new()
            .with_prompt("Ingrese su elección")
            .interact_text()?;
        match value.trim().parse() {
            Ok(choice) => return Ok(choice),
            Err(_) => println!("❌ Debe ingresar un número válido."),
        }
    }
}

pub fn pause() -> Result<()> {
    println!("\n⏸️  Presione Enter para continuar...");
    let mut buffer = String::new();
    std::io::stdin().read_line(&mut buffer)?;
    Ok(())
}
