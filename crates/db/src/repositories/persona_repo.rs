//! Repository for the `persona` table.

use padron_core::types::DbId;
use sqlx::PgPool;

use crate::models::persona::{CreatePersona, Persona};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, created_at, user_id, tipo_id, numero_id, nombres, \
                        primer_apellido, segundo_apellido, genero, fecha_nacimiento, \
                        edad, email, direccion, telefono, id_escala, url_foto";

/// Provides operations on persona records. Personas are created through the
/// creation workflow and never updated or deleted.
pub struct PersonaRepo;

impl PersonaRepo {
    /// Insert a new persona, returning the created row.
    ///
    /// A duplicate `numero_id` surfaces as a unique violation on
    /// `uq_persona_numero_id` -- the authoritative backstop behind the
    /// advisory [`PersonaRepo::exists_by_numero_id`] pre-check.
    pub async fn create(pool: &PgPool, input: &CreatePersona) -> Result<Persona, sqlx::Error> {
        let query = format!(
            "INSERT INTO persona (user_id, tipo_id, numero_id, nombres, primer_apellido,
                                  segundo_apellido, genero, fecha_nacimiento, edad, email,
                                  direccion, telefono, id_escala, url_foto)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Persona>(&query)
            .bind(input.user_id)
            .bind(&input.tipo_id)
            .bind(&input.numero_id)
            .bind(&input.nombres)
            .bind(&input.primer_apellido)
            .bind(&input.segundo_apellido)
            .bind(&input.genero)
            .bind(input.fecha_nacimiento)
            .bind(input.edad)
            .bind(&input.email)
            .bind(&input.direccion)
            .bind(&input.telefono)
            .bind(input.id_escala)
            .bind(&input.url_foto)
            .fetch_one(pool)
            .await
    }

    /// Whether any persona exists with the given identifier number.
    ///
    /// Zero matches is `false`, not an error; only genuine store failures
    /// propagate. Read-only.
    pub async fn exists_by_numero_id(pool: &PgPool, numero_id: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM persona WHERE numero_id = $1)",
        )
        .bind(numero_id)
        .fetch_one(pool)
        .await
    }

    /// Find a persona by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Persona>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM persona WHERE id = $1");
        sqlx::query_as::<_, Persona>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all personas ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Persona>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM persona ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Persona>(&query).fetch_all(pool).await
    }

    /// Count personas with the given identifier number. Used by tests to
    /// assert the uniqueness invariant after concurrent attempts.
    pub async fn count_by_numero_id(pool: &PgPool, numero_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM persona WHERE numero_id = $1")
            .bind(numero_id)
            .fetch_one(pool)
            .await
    }
}
