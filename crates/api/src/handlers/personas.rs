//! Handlers for the `/personas` resource: the record-creation workflow plus
//! read endpoints for the listing page.
//!
//! The creation workflow runs its steps strictly in order, each one a hard
//! gate: authenticate, validate, uniqueness pre-check, photo upload, age
//! derivation, insert. The pre-check and the insert are separate round-trips
//! with no transaction spanning them, so two concurrent submissions can both
//! pass the pre-check; the `uq_persona_numero_id` constraint is the
//! authoritative backstop and its violation is reported as the same
//! duplicate outcome.

use axum::extract::{Multipart, Path, State};
use axum::response::Redirect;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use padron_core::edad::edad_actual;
use padron_core::error::CoreError;
use padron_core::foto::clave_de_foto;
use padron_core::persona::{self, PersonaForm};
use padron_core::types::DbId;
use padron_db::models::persona::{CreatePersona, Persona};
use padron_db::repositories::PersonaRepo;

use crate::auth::jwt::{validate_token, Claims};
use crate::auth::ACCESS_TOKEN_COOKIE;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{redirect_with_error, redirect_with_success, DataResponse};
use crate::state::AppState;

/// Duplicate-identifier message, used for both the advisory pre-check and
/// the constraint backstop so the caller sees one outcome.
const MENSAJE_DUPLICADO: &str = "Ya existe una persona con este número de identificación.";

/// Shown when the session cookie is missing, invalid, or expired.
const MENSAJE_NO_AUTENTICADO: &str = "No estás autenticado o tu sesión ha expirado.";

/// An uploaded photo captured from the multipart stream.
struct FotoSubida {
    nombre: String,
    content_type: String,
    bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/personas
///
/// Run the creation workflow and report the outcome as a redirect back to the
/// listing page, with either a `success` or an `error` query parameter.
pub async fn create(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Redirect {
    match crear_persona(&state, &jar, multipart).await {
        Ok(persona) => {
            tracing::info!(
                persona_id = persona.id,
                numero_id = %persona.numero_id,
                user_id = persona.user_id,
                "Persona creada",
            );
            redirect_with_success("/personas", "Persona creada con éxito")
        }
        Err(err) => {
            tracing::warn!(error = %err, "Persona creation failed");
            redirect_with_error("/personas", &err.user_message())
        }
    }
}

/// GET /api/personas
///
/// List all personas, newest first.
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Persona>>>> {
    let personas = PersonaRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: personas }))
}

/// GET /api/personas/{id}
pub async fn get(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Persona>>> {
    let persona = PersonaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Persona",
            id,
        }))?;
    Ok(Json(DataResponse { data: persona }))
}

// ---------------------------------------------------------------------------
// Creation workflow
// ---------------------------------------------------------------------------

/// The ordered creation workflow. Any error aborts with no partial writes:
/// nothing is uploaded before validation passes, and no row is written when
/// the upload fails.
async fn crear_persona(
    state: &AppState,
    jar: &CookieJar,
    multipart: Multipart,
) -> AppResult<Persona> {
    // 1. Authenticate.
    let claims = autenticar(state, jar)?;

    let (form, foto) = leer_formulario(multipart).await?;

    // 2. Validate every required field before any side effect.
    let valida = persona::validar(&form)?;

    // 3. Advisory uniqueness pre-check (fast feedback; the constraint in
    //    step 6 is the authority).
    if PersonaRepo::exists_by_numero_id(&state.pool, &valida.numero_id).await? {
        return Err(AppError::Core(CoreError::Conflict(MENSAJE_DUPLICADO.into())));
    }

    // 4. Optional photo upload. A store rejection aborts the workflow here.
    let url_foto = match foto {
        Some(foto) if !foto.bytes.is_empty() => {
            Some(subir_foto(state, claims.sub, foto).await?)
        }
        _ => None,
    };

    // 5. Derive the age from the submitted birth date.
    let edad = edad_actual(form.fecha_nacimiento.as_deref(), Utc::now().date_naive());

    // 6. Persist. A unique violation here means a concurrent request won the
    //    race between steps 3 and 6; collapse it into the duplicate outcome.
    let input = CreatePersona {
        user_id: claims.sub,
        tipo_id: valida.tipo_id,
        numero_id: valida.numero_id,
        nombres: valida.nombres,
        primer_apellido: valida.primer_apellido,
        segundo_apellido: valida.segundo_apellido,
        genero: valida.genero,
        fecha_nacimiento: valida.fecha_nacimiento,
        edad,
        email: valida.email,
        direccion: valida.direccion,
        telefono: valida.telefono,
        id_escala: valida.id_escala,
        url_foto,
    };

    PersonaRepo::create(&state.pool, &input)
        .await
        .map_err(|err| {
            if padron_db::is_unique_violation(&err, "uq_persona_numero_id") {
                AppError::Core(CoreError::Conflict(MENSAJE_DUPLICADO.into()))
            } else {
                AppError::Database(err)
            }
        })
}

/// Resolve the session cookie to JWT claims.
///
/// Done in the handler body (not via the [`AuthUser`] extractor) because this
/// flow reports failures through a redirect, not a 401 JSON body.
fn autenticar(state: &AppState, jar: &CookieJar) -> AppResult<Claims> {
    let token = jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| CoreError::Unauthorized(MENSAJE_NO_AUTENTICADO.into()))?;

    let claims = validate_token(&token, &state.config.jwt)
        .map_err(|_| CoreError::Unauthorized(MENSAJE_NO_AUTENTICADO.into()))?;

    Ok(claims)
}

/// Drain the multipart stream into the raw form fields plus the optional
/// photo part.
async fn leer_formulario(
    mut multipart: Multipart,
) -> AppResult<(PersonaForm, Option<FotoSubida>)> {
    let mut form = PersonaForm::default();
    let mut foto = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "foto_upload" {
            let nombre = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?
                .to_vec();
            foto = Some(FotoSubida {
                nombre,
                content_type,
                bytes,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        match name.as_str() {
            "tipo_id" => form.tipo_id = Some(value),
            "numero_id" => form.numero_id = Some(value),
            "nombres" => form.nombres = Some(value),
            "primer_apellido" => form.primer_apellido = Some(value),
            "segundo_apellido" => form.segundo_apellido = Some(value),
            "genero" => form.genero = Some(value),
            "fecha_nacimiento" => form.fecha_nacimiento = Some(value),
            "email" => form.email = Some(value),
            "direccion" => form.direccion = Some(value),
            "telefono" => form.telefono = Some(value),
            "id_escala" => form.id_escala = Some(value),
            _ => {}
        }
    }

    Ok((form, foto))
}

/// Store the photo and return its public URL.
async fn subir_foto(state: &AppState, owner: DbId, foto: FotoSubida) -> AppResult<String> {
    let clave = clave_de_foto(owner, Utc::now().timestamp_millis(), &foto.nombre);

    state
        .storage
        .put(&clave, foto.bytes, &foto.content_type)
        .await?;

    Ok(state.storage.public_url(&clave))
}
