//! Demo data seeding.
//!
//! Populates an empty store with the demo accounts, patients, and records
//! used for local development. All seeded accounts use the password
//! "123456".

use clinic_store::ClinicStore;
use entities::{MedicalRecord, Patient, User, UserRole};

/// Seeds demo users, patients, and records.
pub async fn seed_demo_data<S: ClinicStore>(store: &S) -> anyhow::Result<()> {
    let password_hash = auth::hash_password("123456")?;

    let admin = store
        .create_user(User::new(
            "Admin User",
            "admin@movicare.com",
            password_hash.clone(),
            UserRole::Admin,
        ))
        .await?;

    let maria = store
        .create_user(User::new(
            "Dr. Maria Silva",
            "maria@movicare.com",
            password_hash.clone(),
            UserRole::Physiotherapist,
        ))
        .await?;

    let joao = store
        .create_user(User::new(
            "Dr. João Pereira",
            "joao@movicare.com",
            password_hash,
            UserRole::Physiotherapist,
        ))
        .await?;

    tracing::info!(admin_id = %admin.id, "Demo users seeded");

    let ana = store
        .create_patient(
            Patient::new("Ana Santos", "123.456.789-00", "1985-05-15")
                .with_phone("(11) 98765-4321")
                .with_address("Rua das Flores, 123 - São Paulo, SP"),
        )
        .await?;

    let carlos = store
        .create_patient(
            Patient::new("Carlos Oliveira", "987.654.321-00", "1978-11-22")
                .with_phone("(11) 91234-5678")
                .with_address("Av. Paulista, 1000 - São Paulo, SP"),
        )
        .await?;

    let mariana = store
        .create_patient(
            Patient::new("Mariana Costa", "456.789.123-00", "1990-07-30")
                .with_phone("(11) 95555-9999")
                .with_address("Rua Augusta, 500 - São Paulo, SP"),
        )
        .await?;

    store
        .create_patient(
            Patient::new("Roberto Almeida", "321.654.987-00", "1965-03-12")
                .with_phone("(11) 92222-3333")
                .with_address("Rua Oscar Freire, 200 - São Paulo, SP"),
        )
        .await?;

    let records = [
        MedicalRecord::new(
            ana.id,
            "Avaliação inicial - Dor lombar",
            "Paciente relata dor lombar há 2 semanas. Recomendado exercícios de fortalecimento e alongamento.",
            maria.id,
            maria.name.clone(),
        ),
        MedicalRecord::new(
            ana.id,
            "Sessão de fisioterapia - Tratamento lombar",
            "Paciente apresentou melhora significativa após exercícios. Continuar com o tratamento atual.",
            maria.id,
            maria.name.clone(),
        ),
        MedicalRecord::new(
            carlos.id,
            "Avaliação inicial - Recuperação pós-cirúrgica joelho",
            "Paciente em recuperação de artroscopia no joelho direito. Iniciado protocolo de reabilitação.",
            joao.id,
            joao.name.clone(),
        ),
        MedicalRecord::new(
            mariana.id,
            "Avaliação inicial - Tendinite",
            "Paciente com tendinite no ombro direito. Iniciado tratamento com ultrassom e exercícios.",
            maria.id,
            maria.name.clone(),
        ),
    ];

    for record in records {
        store.create_record(record).await?;
    }

    tracing::info!("Demo data seeded");

    Ok(())
}
