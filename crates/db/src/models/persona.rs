//! Persona entity model and DTOs.

use chrono::NaiveDate;
use padron_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A persona row from the `persona` table.
///
/// `id` and `created_at` are store-assigned; `edad` is derived once at
/// creation time and not kept in sync afterwards.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Persona {
    pub id: DbId,
    pub created_at: Timestamp,
    pub user_id: DbId,
    pub tipo_id: String,
    pub numero_id: String,
    pub nombres: String,
    pub primer_apellido: String,
    pub segundo_apellido: Option<String>,
    pub genero: String,
    pub fecha_nacimiento: NaiveDate,
    pub edad: Option<i32>,
    pub email: String,
    pub direccion: String,
    pub telefono: String,
    pub id_escala: i32,
    pub url_foto: Option<String>,
}

/// DTO for inserting a new persona, already validated and with the derived
/// `edad` and (optional) photo URL resolved.
#[derive(Debug, Clone)]
pub struct CreatePersona {
    pub user_id: DbId,
    pub tipo_id: String,
    pub numero_id: String,
    pub nombres: String,
    pub primer_apellido: String,
    pub segundo_apellido: Option<String>,
    pub genero: String,
    pub fecha_nacimiento: NaiveDate,
    pub edad: Option<i32>,
    pub email: String,
    pub direccion: String,
    pub telefono: String,
    pub id_escala: i32,
    pub url_foto: Option<String>,
}
