//! Validation of submitted persona fields.
//!
//! Every required field is enforced uniformly here, before any side effect
//! (uniqueness query, photo upload, insert) runs. Error messages name the
//! offending field and are shown to the user verbatim.

use chrono::NaiveDate;
use validator::ValidateEmail;

use crate::edad::FORMATO_FECHA;
use crate::error::CoreError;

/// Raw form fields as received from the creation endpoint, before any
/// validation. `None` and empty string both mean "not provided".
#[derive(Debug, Default, Clone)]
pub struct PersonaForm {
    pub tipo_id: Option<String>,
    pub numero_id: Option<String>,
    pub nombres: Option<String>,
    pub primer_apellido: Option<String>,
    pub segundo_apellido: Option<String>,
    pub genero: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub email: Option<String>,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub id_escala: Option<String>,
}

/// Persona fields that passed validation, with dates and numbers parsed.
#[derive(Debug, Clone)]
pub struct PersonaValidada {
    pub tipo_id: String,
    pub numero_id: String,
    pub nombres: String,
    pub primer_apellido: String,
    pub segundo_apellido: Option<String>,
    pub genero: String,
    pub fecha_nacimiento: NaiveDate,
    pub email: String,
    pub direccion: String,
    pub telefono: String,
    pub id_escala: i32,
}

/// Validate a submitted form, producing the typed persona fields.
///
/// All fields except `segundo_apellido` are mandatory. `fecha_nacimiento`
/// must be a `%Y-%m-%d` date, `email` a well-formed address, and `id_escala`
/// an integer.
pub fn validar(form: &PersonaForm) -> Result<PersonaValidada, CoreError> {
    let tipo_id = requerido(&form.tipo_id, "tipo_id")?;
    let numero_id = requerido(&form.numero_id, "numero_id")?;
    let nombres = requerido(&form.nombres, "nombres")?;
    let primer_apellido = requerido(&form.primer_apellido, "primer_apellido")?;
    let genero = requerido(&form.genero, "genero")?;
    let fecha = requerido(&form.fecha_nacimiento, "fecha_nacimiento")?;
    let email = requerido(&form.email, "email")?;
    let direccion = requerido(&form.direccion, "direccion")?;
    let telefono = requerido(&form.telefono, "telefono")?;
    let id_escala = requerido(&form.id_escala, "id_escala")?;

    let fecha_nacimiento = NaiveDate::parse_from_str(&fecha, FORMATO_FECHA).map_err(|_| {
        CoreError::Validation(
            "El campo 'fecha_nacimiento' no es una fecha válida (AAAA-MM-DD).".into(),
        )
    })?;

    if !email.validate_email() {
        return Err(CoreError::Validation(
            "El campo 'email' no es una dirección de correo válida.".into(),
        ));
    }

    let id_escala: i32 = id_escala.parse().map_err(|_| {
        CoreError::Validation("El campo 'id_escala' debe ser un número entero.".into())
    })?;

    // An empty optional surname is stored as NULL, not as "".
    let segundo_apellido = form
        .segundo_apellido
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    Ok(PersonaValidada {
        tipo_id,
        numero_id,
        nombres,
        primer_apellido,
        segundo_apellido,
        genero,
        fecha_nacimiento,
        email,
        direccion,
        telefono,
        id_escala,
    })
}

/// Extract a mandatory field, trimming surrounding whitespace.
fn requerido(valor: &Option<String>, campo: &str) -> Result<String, CoreError> {
    match valor.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CoreError::Validation(format!(
            "El campo '{campo}' es obligatorio."
        ))),
    }
}
