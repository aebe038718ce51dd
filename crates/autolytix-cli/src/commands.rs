//! Command definitions and execution.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{bail, Context as _, Result};
use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use autolytix_core::api::messages::{self, api_error};
use autolytix_core::auth::token;
use autolytix_core::models::dashboard::DEFAULT_DASHBOARD_LIMIT;
use autolytix_core::models::{
    overdue_alert, sort_newest_first, DashboardQuery, LoginResponse, MaintenanceRequest,
    MaintenanceType, PasswordUpdateRequest, ProfileUpdateRequest, RegisterRequest, VehicleRequest,
};
use autolytix_core::utils::format::parse_date;
use autolytix_core::utils::validation::{
    self, ValidationError, MIN_LOGIN_PASSWORD_LENGTH, MIN_REGISTER_PASSWORD_LENGTH,
    MIN_RESET_PASSWORD_LENGTH,
};
use autolytix_core::utils::{format_date, format_kilometers, format_price, time_ago, truncate_string};
use autolytix_core::Route;

use crate::Context;

/// Width of the notes column in the maintenance listing.
const NOTES_WIDTH: usize = 40;

#[derive(Parser, Debug)]
#[command(
    name = "autolytix",
    about = "Seguimiento del mantenimiento de tus vehículos desde la terminal",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Inicia sesión con email y contraseña, o con Google
    Login {
        /// Email de la cuenta (por defecto, el último usado)
        email: Option<String>,

        /// ID token de Google en lugar de email y contraseña
        #[arg(long, value_name = "ID_TOKEN", conflicts_with = "email")]
        google: Option<String>,
    },

    /// Crea una cuenta
    Register,

    /// Cierra la sesión
    Logout,

    /// Muestra la sesión actual
    #[command(name = "whoami")]
    WhoAmI,

    /// Muestra el perfil, o lo edita con un subcomando
    Profile {
        #[command(subcommand)]
        command: Option<ProfileCommand>,
    },

    /// Lista tus vehículos
    Vehicles {
        /// Revisa también los mantenimientos vencidos de cada vehículo
        #[arg(long)]
        alerts: bool,
    },

    /// Detalle, alta, edición y baja de un vehículo
    Vehicle {
        #[command(subcommand)]
        command: VehicleCommand,
    },

    /// Actualiza el kilometraje de un vehículo
    Km {
        /// Id del vehículo
        id: i64,
        /// Kilometraje actual
        km: i64,
    },

    /// Historial y registro de mantenimientos
    Maintenance {
        #[command(subcommand)]
        command: MaintenanceCommand,
    },

    /// Resumen con alertas y actividad reciente
    Dashboard {
        /// Número máximo de alertas
        #[arg(default_value_t = DEFAULT_DASHBOARD_LIMIT)]
        limit_alerts: u32,
        /// Número máximo de entradas de actividad
        #[arg(default_value_t = DEFAULT_DASHBOARD_LIMIT)]
        limit_activity: u32,
    },

    /// Verifica el email con el token recibido
    VerifyEmail { token: String },

    /// Vuelve a enviar el email de verificación
    ResendVerification { email: String },

    /// Solicita el cambio de contraseña
    ForgotPassword { email: String },

    /// Establece una contraseña nueva con el token recibido
    ResetPassword { token: String },

    /// Comprueba el servidor
    Health,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ProfileCommand {
    /// Cambia nombre, apellido o teléfono
    Edit {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Teléfono; una cadena vacía lo borra
        #[arg(long)]
        phone: Option<String>,
    },

    /// Cambia la contraseña
    Password,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum VehicleCommand {
    /// Detalle con el último servicio y el mantenimiento vencido
    Show { id: i64 },

    /// Registra un vehículo
    Add {
        #[arg(long)]
        plate: String,
        #[arg(long)]
        make: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        year: i32,
        #[arg(long, default_value_t = 0)]
        km: i64,
    },

    /// Modifica los datos de un vehículo
    Edit {
        id: i64,
        #[arg(long)]
        plate: Option<String>,
        #[arg(long)]
        make: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        km: Option<i64>,
    },

    /// Elimina un vehículo
    Rm {
        id: i64,
        /// No pedir confirmación
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum MaintenanceCommand {
    /// Historial de un vehículo, del más reciente al más antiguo
    List { vehicle_id: i64 },

    /// Registra un mantenimiento
    Add {
        vehicle_id: i64,
        /// ACEITE, NEUMATICOS, ITV, FRENOS, SEGURO, FILTROS, BATERIA, REVISION u OTROS
        #[arg(long = "type", value_parser = parse_maintenance_type)]
        kind: MaintenanceType,
        #[arg(long)]
        km: i64,
        #[arg(long)]
        price: f64,
        /// Fecha AAAA-MM-DD (por defecto, hoy)
        #[arg(long)]
        date: Option<String>,
        #[command(flatten)]
        extra: MaintenanceExtra,
    },

    /// Modifica un mantenimiento del historial de un vehículo
    Edit {
        vehicle_id: i64,
        id: i64,
        #[arg(long = "type", value_parser = parse_maintenance_type)]
        kind: Option<MaintenanceType>,
        #[arg(long)]
        km: Option<i64>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        date: Option<String>,
        #[command(flatten)]
        extra: MaintenanceExtra,
    },

    /// Elimina un mantenimiento
    Rm {
        vehicle_id: i64,
        id: i64,
        /// No pedir confirmación
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Optional maintenance fields shared by `add` and `edit`.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct MaintenanceExtra {
    /// Notas; una cadena vacía las borra
    #[arg(long)]
    notes: Option<String>,
    /// Kilometraje del próximo servicio
    #[arg(long)]
    next_km: Option<i64>,
    /// Fecha del próximo servicio, AAAA-MM-DD
    #[arg(long)]
    next_date: Option<String>,
}

impl MaintenanceExtra {
    fn apply(&self, request: &mut MaintenanceRequest) {
        if let Some(notes) = &self.notes {
            request.notes = Some(notes.trim().to_string()).filter(|n| !n.is_empty());
        }
        if self.next_km.is_some() {
            request.next_km = self.next_km;
        }
        if self.next_date.is_some() {
            request.next_date = self.next_date.clone();
        }
    }
}

fn parse_maintenance_type(value: &str) -> Result<MaintenanceType, String> {
    MaintenanceType::from_code(&value.trim().to_uppercase()).ok_or_else(|| {
        let codes: Vec<&str> = MaintenanceType::ALL.iter().map(|t| t.code()).collect();
        format!("tipo desconocido; usa uno de: {}", codes.join(", "))
    })
}

impl MaintenanceCommand {
    fn vehicle_id(&self) -> i64 {
        match self {
            MaintenanceCommand::List { vehicle_id }
            | MaintenanceCommand::Add { vehicle_id, .. }
            | MaintenanceCommand::Edit { vehicle_id, .. }
            | MaintenanceCommand::Rm { vehicle_id, .. } => *vehicle_id,
        }
    }
}

impl Command {
    /// Screen this command stands in for, when it needs a session.
    fn route(&self) -> Option<Route> {
        match self {
            Command::Profile { .. } => Some(Route::Profile),
            Command::Vehicles { .. }
            | Command::Vehicle {
                command: VehicleCommand::Add { .. },
            } => Some(Route::Vehicles),
            Command::Vehicle {
                command:
                    VehicleCommand::Show { id } | VehicleCommand::Edit { id, .. } | VehicleCommand::Rm { id, .. },
            }
            | Command::Km { id, .. } => Some(Route::VehicleDetail(*id)),
            Command::Maintenance { command } => Some(Route::MaintenanceHistory(command.vehicle_id())),
            Command::Dashboard { .. } => Some(Route::Home),
            _ => None,
        }
    }

    /// Fallback message when an API failure has no specific one.
    fn error_message(&self, err: &anyhow::Error) -> String {
        match self {
            Command::Vehicles { .. } => messages::vehicle_list_message(err),
            Command::Maintenance {
                command: MaintenanceCommand::List { .. },
            } => messages::maintenance_history_message(err),
            Command::Dashboard { .. } => messages::dashboard_message(err),
            _ => messages::user_message(err, messages::DEFAULT_ERROR_MESSAGE),
        }
    }
}

/// Run `command`, reporting API failures with a readable message.
pub async fn run(ctx: &Context, command: Command) -> Result<ExitCode> {
    if let Some(route) = command.route() {
        if !ctx.guard.can_activate(route) {
            return Ok(ExitCode::FAILURE);
        }
    }

    match execute(ctx, &command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) if api_error(&e).is_some() => {
            warn!(error = %format!("{:#}", e), "Command failed");
            eprintln!("{}", command.error_message(&e));
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e),
    }
}

async fn execute(ctx: &Context, command: &Command) -> Result<()> {
    match command {
        Command::Login { email, google } => match google {
            Some(id_token) => login_with_google(ctx, id_token).await?,
            None => login(ctx, email.clone()).await?,
        },
        Command::Register => register(ctx).await?,
        Command::Logout => {
            ctx.session.logout();
            println!("Sesión cerrada.");
        }
        Command::WhoAmI => whoami(ctx),
        Command::Profile { command } => match command {
            None => profile(ctx),
            Some(ProfileCommand::Edit {
                first_name,
                last_name,
                phone,
            }) => edit_profile(ctx, first_name.as_deref(), last_name.as_deref(), phone.as_deref()).await?,
            Some(ProfileCommand::Password) => change_password(ctx).await?,
        },
        Command::Vehicles { alerts } => vehicles(ctx, *alerts).await?,
        Command::Vehicle { command } => vehicle_command(ctx, command).await?,
        Command::Km { id, km } => update_km(ctx, *id, *km).await?,
        Command::Maintenance { command } => maintenance_command(ctx, command).await?,
        Command::Dashboard {
            limit_alerts,
            limit_activity,
        } => {
            let query = DashboardQuery {
                limit_alerts: *limit_alerts,
                limit_activity: *limit_activity,
            };
            dashboard(ctx, query).await?
        }
        Command::VerifyEmail { token } => {
            let response = ctx.client.verify_email(token.trim()).await?;
            println!("{}", non_empty(&response.message, "Email verificado."));
        }
        Command::ResendVerification { email } => {
            validation::validate_email(email)?;
            let response = ctx.client.resend_verification(email.trim()).await?;
            println!("{}", non_empty(&response.message, "Email de verificación enviado."));
        }
        Command::ForgotPassword { email } => {
            validation::validate_email(email)?;
            let response = ctx.client.forgot_password(email.trim()).await?;
            println!(
                "{}",
                non_empty(&response.message, "Si el email existe, recibirás instrucciones.")
            );
        }
        Command::ResetPassword { token } => reset_password(ctx, token.trim()).await?,
        Command::Health => {
            let status = ctx.client.health().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}

fn non_empty<'a>(message: &'a str, fallback: &'a str) -> &'a str {
    if message.trim().is_empty() {
        fallback
    } else {
        message
    }
}

/// Trimmed `value`, or a `Required` error naming `field`.
fn required(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required(field).into());
    }
    Ok(value.to_string())
}

fn validate_date(value: &str) -> Result<()> {
    if parse_date(value).is_none() {
        bail!("La fecha no es válida: {}", value);
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line).context("Failed to read input")?;
    Ok(line.trim().to_string())
}

fn prompt_optional(label: &str) -> Result<Option<String>> {
    Ok(Some(prompt(label)?).filter(|v| !v.is_empty()))
}

fn prompt_password(label: &str) -> Result<String> {
    rpassword::prompt_password(label).context("Failed to read password")
}

/// Ask before a destructive action unless `--yes` was given.
fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let answer = prompt(&format!("{} [s/N] ", question))?;
    Ok(matches!(answer.to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes"))
}

async fn login(ctx: &Context, email: Option<String>) -> Result<()> {
    let email = match email.or_else(|| ctx.config.last_email.clone()) {
        Some(email) => {
            println!("Email: {}", email);
            email
        }
        None => prompt("Email: ")?,
    };
    validation::validate_email(&email)?;
    let password = prompt_password("Contraseña: ")?;
    validation::validate_password(&password, MIN_LOGIN_PASSWORD_LENGTH)?;

    let response = ctx.client.login(&email, &password).await?;
    finish_login(ctx, &response)?;

    let mut config = ctx.config.clone();
    config.last_email = Some(email);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }
    Ok(())
}

async fn login_with_google(ctx: &Context, id_token: &str) -> Result<()> {
    let id_token = required("El token de Google", id_token)?;
    let response = ctx.client.login_with_google(&id_token).await?;
    finish_login(ctx, &response)
}

/// Save the user of a successful login once the token is known to be usable.
fn finish_login(ctx: &Context, response: &LoginResponse) -> Result<()> {
    if !ctx.session.tokens().has_valid_token() {
        bail!("El servidor no devolvió una sesión válida");
    }
    let user = ctx.session.save_user(response)?;
    println!("Bienvenido, {}.", user.full_name());
    Ok(())
}

async fn register(ctx: &Context) -> Result<()> {
    let first_name = prompt("Nombre: ")?;
    validation::validate_name("El nombre", &first_name)?;
    let last_name = prompt_optional("Apellido (opcional): ")?;
    let email = prompt("Email: ")?;
    validation::validate_email(&email)?;
    let phone = prompt_optional("Teléfono (opcional): ")?;
    validation::validate_phone(phone.as_deref())?;
    let password = prompt_password("Contraseña: ")?;
    validation::validate_password(&password, MIN_REGISTER_PASSWORD_LENGTH)?;
    let confirmation = prompt_password("Repite la contraseña: ")?;
    validation::validate_password_confirmation(&password, &confirmation)?;

    let request = RegisterRequest {
        first_name,
        last_name,
        email,
        phone,
        password,
    };
    let response = ctx.client.register(&request).await?;

    if ctx.session.tokens().has_valid_token() {
        let user = ctx.session.save_user(&response)?;
        println!("Cuenta creada. Bienvenido, {}.", user.full_name());
    } else {
        println!(
            "{}",
            non_empty(&response.message, "Cuenta creada. Revisa tu email para verificarla.")
        );
    }
    Ok(())
}

async fn reset_password(ctx: &Context, token: &str) -> Result<()> {
    let password = prompt_password("Nueva contraseña: ")?;
    validation::validate_password(&password, MIN_RESET_PASSWORD_LENGTH)?;
    let confirmation = prompt_password("Repite la contraseña: ")?;
    validation::validate_password_confirmation(&password, &confirmation)?;

    let response = ctx.client.reset_password(token, &password).await?;
    println!("{}", non_empty(&response.message, "Contraseña actualizada."));
    Ok(())
}

fn whoami(ctx: &Context) {
    let Some(user) = ctx.session.user() else {
        println!("Sin sesión.");
        return;
    };
    println!("{} <{}>", user.full_name(), user.email);

    let expiry = ctx
        .session
        .tokens()
        .get_token()
        .and_then(|t| token::expires_at(&t));
    match expiry {
        Some(at) if ctx.session.is_authenticated() => println!(
            "Sesión válida hasta {}",
            at.with_timezone(&Local).format("%d/%m/%Y %H:%M")
        ),
        _ => println!("La sesión ha expirado."),
    }
}

fn profile(ctx: &Context) {
    let Some(user) = ctx.session.user() else {
        return;
    };
    println!("Nombre:    {}", user.full_name());
    println!("Email:     {}", user.email);
    println!("Teléfono:  {}", user.phone.as_deref().unwrap_or("-"));
    println!("Alta:      {}", format_date(user.created_at.as_deref()));
}

/// Profile update built from the stored values and the given changes.
/// An empty `phone` clears it.
fn profile_update(
    current_first: &str,
    current_last: &str,
    current_phone: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
    phone: Option<&str>,
) -> Result<ProfileUpdateRequest> {
    let first_name = first_name.unwrap_or(current_first).trim().to_string();
    validation::validate_name("El nombre", &first_name)?;
    let phone = match phone {
        Some(p) => Some(p.trim().to_string()).filter(|p| !p.is_empty()),
        None => current_phone.map(str::to_string),
    };
    validation::validate_phone(phone.as_deref())?;

    Ok(ProfileUpdateRequest {
        first_name,
        last_name: last_name.unwrap_or(current_last).trim().to_string(),
        phone,
    })
}

async fn edit_profile(
    ctx: &Context,
    first_name: Option<&str>,
    last_name: Option<&str>,
    phone: Option<&str>,
) -> Result<()> {
    let Some(user) = ctx.session.user() else {
        bail!("No hay un usuario en la sesión");
    };
    let request = profile_update(
        &user.first_name,
        &user.last_name,
        user.phone.as_deref(),
        first_name,
        last_name,
        phone,
    )?;
    let updated = ctx.client.update_profile(&request).await?;
    println!("Perfil actualizado: {}", updated.full_name());
    Ok(())
}

async fn change_password(ctx: &Context) -> Result<()> {
    let current_password = prompt_password("Contraseña actual: ")?;
    validation::validate_password(&current_password, MIN_LOGIN_PASSWORD_LENGTH)?;
    let new_password = prompt_password("Nueva contraseña: ")?;
    validation::validate_password(&new_password, MIN_REGISTER_PASSWORD_LENGTH)?;
    let confirmation = prompt_password("Repite la contraseña: ")?;
    validation::validate_password_confirmation(&new_password, &confirmation)?;

    let request = PasswordUpdateRequest {
        current_password,
        new_password,
    };
    let response = ctx.client.update_password(&request).await?;
    println!("{}", non_empty(&response.message, "Contraseña actualizada."));
    Ok(())
}

async fn vehicles(ctx: &Context, alerts: bool) -> Result<()> {
    let vehicles = ctx.client.vehicles().await?;
    if vehicles.is_empty() {
        println!("No tienes vehículos registrados.");
        return Ok(());
    }

    let histories = if alerts {
        ctx.client.maintenances_for(&vehicles).await?
    } else {
        Vec::new()
    };

    for v in &vehicles {
        println!(
            "{:>5}  {:<32} {:>12} km",
            v.id,
            v.label(),
            format_kilometers(Some(v.current_km))
        );
        let history = histories
            .iter()
            .find(|(id, _)| *id == v.id)
            .map(|(_, records)| records.as_slice());
        if let Some(alert) = history.and_then(|h| overdue_alert(v.current_km, h)) {
            println!(
                "       ¡{} vencido! {} km de retraso",
                alert.type_label,
                format_kilometers(Some(alert.overdue_km))
            );
        }
    }
    Ok(())
}

async fn vehicle_command(ctx: &Context, command: &VehicleCommand) -> Result<()> {
    match command {
        VehicleCommand::Show { id } => show_vehicle(ctx, *id).await,
        VehicleCommand::Add {
            plate,
            make,
            model,
            year,
            km,
        } => {
            let request = VehicleRequest {
                plate: required("La matrícula", plate)?.to_uppercase(),
                make: required("La marca", make)?,
                model: required("El modelo", model)?,
                year: *year,
                current_km: *km,
            };
            validation::validate_new_vehicle_year(request.year, Local::now().year())?;
            validation::validate_km(request.current_km)?;

            let vehicle = ctx.client.create_vehicle(&request).await?;
            println!("Vehículo {} registrado: {}", vehicle.id, vehicle.label());
            Ok(())
        }
        VehicleCommand::Edit {
            id,
            plate,
            make,
            model,
            year,
            km,
        } => {
            let current = ctx.client.vehicle(*id).await?;
            let mut request = VehicleRequest::from(&current);
            if let Some(plate) = plate {
                request.plate = required("La matrícula", plate)?.to_uppercase();
            }
            if let Some(make) = make {
                request.make = required("La marca", make)?;
            }
            if let Some(model) = model {
                request.model = required("El modelo", model)?;
            }
            request.year = year.unwrap_or(request.year);
            request.current_km = km.unwrap_or(request.current_km);
            validation::validate_vehicle_year(request.year)?;
            validation::validate_km(request.current_km)?;

            let vehicle = ctx.client.update_vehicle(*id, &request).await?;
            println!("Vehículo actualizado: {}", vehicle.label());
            Ok(())
        }
        VehicleCommand::Rm { id, yes } => {
            let vehicle = ctx.client.vehicle(*id).await?;
            let question = format!("¿Eliminar {} y su historial?", vehicle.label());
            if !confirm(&question, *yes)? {
                println!("Cancelado.");
                return Ok(());
            }
            ctx.client.delete_vehicle(*id).await?;
            println!("Vehículo eliminado.");
            Ok(())
        }
    }
}

async fn show_vehicle(ctx: &Context, id: i64) -> Result<()> {
    let (vehicle, mut history) =
        tokio::try_join!(ctx.client.vehicle(id), ctx.client.maintenances(id))?;
    sort_newest_first(&mut history);

    println!("{}", vehicle.label());
    println!("Año:            {}", vehicle.year);
    println!("Kilometraje:    {} km", format_kilometers(Some(vehicle.current_km)));
    if let Some(updated) = vehicle.km_updated_at.as_deref() {
        println!("Actualizado:    {}", time_ago(Some(updated)));
    }

    match history.first() {
        Some(last) => println!(
            "Último servicio: {} - {} ({} km)",
            last.type_label(),
            format_date(Some(&last.date)),
            format_kilometers(Some(last.km))
        ),
        None => println!("Sin mantenimientos registrados."),
    }

    if let Some(alert) = overdue_alert(vehicle.current_km, &history) {
        println!(
            "¡Atención! {} vencido: previsto a los {} km, {} km de retraso.",
            alert.type_label,
            format_kilometers(Some(alert.due_km)),
            format_kilometers(Some(alert.overdue_km))
        );
    }
    Ok(())
}

async fn update_km(ctx: &Context, id: i64, km: i64) -> Result<()> {
    validation::validate_km(km)?;
    let vehicle = ctx.client.update_vehicle_km(id, km).await?;
    println!(
        "{}: {} km",
        vehicle.label(),
        format_kilometers(Some(vehicle.current_km))
    );
    Ok(())
}

fn validate_maintenance(request: &MaintenanceRequest) -> Result<()> {
    validation::validate_km(request.km)?;
    validation::validate_price(request.price)?;
    validate_date(&request.date)?;
    if let Some(next_km) = request.next_km {
        validation::validate_km(next_km)?;
    }
    if let Some(next_date) = request.next_date.as_deref() {
        validate_date(next_date)?;
    }
    Ok(())
}

async fn maintenance_command(ctx: &Context, command: &MaintenanceCommand) -> Result<()> {
    match command {
        MaintenanceCommand::List { vehicle_id } => list_maintenance(ctx, *vehicle_id).await,
        MaintenanceCommand::Add {
            vehicle_id,
            kind,
            km,
            price,
            date,
            extra,
        } => {
            let mut request = MaintenanceRequest {
                vehicle_id: *vehicle_id,
                kind: kind.code().to_string(),
                date: date
                    .clone()
                    .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string()),
                km: *km,
                price: *price,
                notes: None,
                next_km: None,
                next_date: None,
            };
            extra.apply(&mut request);
            validate_maintenance(&request)?;

            let record = ctx.client.create_maintenance(&request).await?;
            println!(
                "{} registrado el {} ({} km).",
                record.type_label(),
                format_date(Some(&record.date)),
                format_kilometers(Some(record.km))
            );
            Ok(())
        }
        MaintenanceCommand::Edit {
            vehicle_id,
            id,
            kind,
            km,
            price,
            date,
            extra,
        } => {
            let history = ctx.client.maintenances(*vehicle_id).await?;
            let Some(current) = history.iter().find(|m| m.id == *id) else {
                bail!("El vehículo {} no tiene el mantenimiento {}", vehicle_id, id);
            };
            let mut request = MaintenanceRequest::from(current);
            if let Some(kind) = kind {
                request.kind = kind.code().to_string();
            }
            request.km = km.unwrap_or(request.km);
            request.price = price.unwrap_or(request.price);
            if let Some(date) = date {
                request.date = date.clone();
            }
            extra.apply(&mut request);
            validate_maintenance(&request)?;

            let record = ctx.client.update_maintenance(*id, &request).await?;
            println!("{} actualizado.", record.type_label());
            Ok(())
        }
        MaintenanceCommand::Rm { id, yes, .. } => {
            if !confirm(&format!("¿Eliminar el mantenimiento {}?", id), *yes)? {
                println!("Cancelado.");
                return Ok(());
            }
            ctx.client.delete_maintenance(*id).await?;
            println!("Mantenimiento eliminado.");
            Ok(())
        }
    }
}

async fn list_maintenance(ctx: &Context, vehicle_id: i64) -> Result<()> {
    let mut history = ctx.client.maintenances(vehicle_id).await?;
    if history.is_empty() {
        println!("Sin mantenimientos registrados.");
        return Ok(());
    }
    sort_newest_first(&mut history);

    for m in &history {
        println!(
            "{:>5}  {:<10}  {:<12} {:>10} km {:>12}  {}",
            m.id,
            format_date(Some(&m.date)),
            m.type_label(),
            format_kilometers(Some(m.km)),
            format_price(m.price),
            truncate_string(m.notes.as_deref().unwrap_or(""), NOTES_WIDTH)
        );
    }
    Ok(())
}

async fn dashboard(ctx: &Context, query: DashboardQuery) -> Result<()> {
    let dashboard = ctx.client.dashboard(query).await?;
    let stats = &dashboard.stats;
    println!("Vehículos: {}   Alertas activas: {}", stats.total_vehicles, stats.active_alerts);

    if let Some(next) = &stats.next_maintenance {
        let detail = next
            .message
            .clone()
            .unwrap_or_else(|| format!("{:?}", next.status));
        println!("Próximo mantenimiento: {} - {}", next.vehicle_label, detail);
    }
    if let Some(last) = &stats.last_km_update {
        println!(
            "Último kilometraje: {} - {} km ({})",
            last.vehicle_label,
            format_kilometers(Some(last.current_km)),
            time_ago(Some(&last.updated_at))
        );
    }

    if !dashboard.alerts.is_empty() {
        println!("\nAlertas:");
        for alert in &dashboard.alerts {
            println!("  [{:?}] {} - {}", alert.priority, alert.vehicle_label, alert.message);
        }
    }
    if !dashboard.activity.is_empty() {
        println!("\nActividad reciente:");
        for item in &dashboard.activity {
            let when = item
                .time_ago
                .clone()
                .unwrap_or_else(|| time_ago(Some(&item.timestamp)));
            println!("  {} - {}: {} ({})", when, item.vehicle_label, item.title, item.description);
        }
    }
    Ok(())
}
