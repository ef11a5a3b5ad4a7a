//! Integration tests for the persona repository against a real database:
//! insert + returned columns, existence checks, the unique-constraint
//! backstop, and list ordering.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use padron_db::models::persona::CreatePersona;
use padron_db::models::user::CreateUser;
use padron_db::repositories::{PersonaRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, email: &str) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "$argon2id$fake-hash-for-tests".to_string(),
        },
    )
    .await
    .expect("user insert should succeed");
    user.id
}

fn nueva_persona(user_id: i64, numero_id: &str) -> CreatePersona {
    CreatePersona {
        user_id,
        tipo_id: "CC".to_string(),
        numero_id: numero_id.to_string(),
        nombres: "Ana María".to_string(),
        primer_apellido: "García".to_string(),
        segundo_apellido: None,
        genero: "F".to_string(),
        fecha_nacimiento: NaiveDate::from_ymd_opt(1995, 3, 20).unwrap(),
        edad: Some(29),
        email: "ana@example.com".to_string(),
        direccion: "Calle 1 #2-3".to_string(),
        telefono: "3001234567".to_string(),
        id_escala: 2,
        url_foto: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_returns_store_assigned_fields(pool: PgPool) {
    let user_id = seed_user(&pool, "creador@example.com").await;

    let persona = PersonaRepo::create(&pool, &nueva_persona(user_id, "12345"))
        .await
        .expect("insert should succeed");

    assert!(persona.id > 0);
    assert_eq!(persona.user_id, user_id);
    assert_eq!(persona.numero_id, "12345");
    assert_eq!(persona.edad, Some(29));
    assert!(persona.url_foto.is_none());

    let fetched = PersonaRepo::find_by_id(&pool, persona.id)
        .await
        .unwrap()
        .expect("row should exist");
    assert_eq!(fetched.created_at, persona.created_at);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_exists_by_numero_id(pool: PgPool) {
    let user_id = seed_user(&pool, "creador@example.com").await;

    assert!(!PersonaRepo::exists_by_numero_id(&pool, "12345")
        .await
        .unwrap());

    PersonaRepo::create(&pool, &nueva_persona(user_id, "12345"))
        .await
        .unwrap();

    assert!(PersonaRepo::exists_by_numero_id(&pool, "12345")
        .await
        .unwrap());
    assert!(!PersonaRepo::exists_by_numero_id(&pool, "99999")
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_verification_is_idempotent(pool: PgPool) {
    let user_id = seed_user(&pool, "creador@example.com").await;
    PersonaRepo::create(&pool, &nueva_persona(user_id, "12345"))
        .await
        .unwrap();

    // Two calls with no intervening insert must agree.
    let primera = PersonaRepo::exists_by_numero_id(&pool, "12345").await.unwrap();
    let segunda = PersonaRepo::exists_by_numero_id(&pool, "12345").await.unwrap();
    assert_eq!(primera, segunda);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_numero_id_hits_unique_constraint(pool: PgPool) {
    let user_id = seed_user(&pool, "creador@example.com").await;
    PersonaRepo::create(&pool, &nueva_persona(user_id, "99999"))
        .await
        .unwrap();

    let err = PersonaRepo::create(&pool, &nueva_persona(user_id, "99999"))
        .await
        .expect_err("second insert with the same numero_id must fail");

    assert!(padron_db::is_unique_violation(&err, "uq_persona_numero_id"));
    assert_matches!(err, sqlx::Error::Database(_));

    // The backstop left exactly one row behind.
    let count = PersonaRepo::count_by_numero_id(&pool, "99999").await.unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_orders_newest_first(pool: PgPool) {
    let user_id = seed_user(&pool, "creador@example.com").await;
    let primera = PersonaRepo::create(&pool, &nueva_persona(user_id, "11111"))
        .await
        .unwrap();
    let segunda = PersonaRepo::create(&pool, &nueva_persona(user_id, "22222"))
        .await
        .unwrap();

    let listado = PersonaRepo::list(&pool).await.unwrap();
    assert_eq!(listado.len(), 2);
    assert_eq!(listado[0].id, segunda.id);
    assert_eq!(listado[1].id, primera.id);
}
