// src/cuidados/cuidados_structs.rs

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Medição de sinais vitais registrada pelo cuidador.
#[derive(Serialize, FromRow)]
pub struct SinalVital {
    pub id: i32,
    pub pressao_arterial: String,
    pub frequencia_cardiaca: i32,
    pub temperatura: f64,
    pub glicemia: Option<i32>,
    pub saturacao_oxigenio: Option<i32>,
    pub data_medicao: DateTime<Utc>,
}

/// Corpo do registro de uma nova medição.
#[derive(Deserialize)]
pub struct NovoSinalVital {
    pub pressao_arterial: String,
    pub frequencia_cardiaca: i32,
    pub temperatura: f64,
    pub glicemia: Option<i32>,
    pub saturacao_oxigenio: Option<i32>,
}

/// Medicação ativa do paciente, com a contagem de administrações de hoje.
#[derive(Serialize, FromRow)]
pub struct Medicacao {
    pub id: i32,
    pub nome: String,
    pub dosagem: String,
    pub horario_administracao: NaiveTime,
    pub administrado_hoje: i64,
}

/// Corpo do registro de uma administração de medicação.
#[derive(Deserialize)]
pub struct NovoRegistroMedicacao {
    pub medicacao_id: i32,
    pub observacoes: Option<String>,
}

/// Evolução (nota de cuidado) com o nome de quem registrou.
#[derive(Serialize, FromRow)]
pub struct Evolucao {
    pub id: i32,
    pub descricao: String,
    pub tipo: String,
    pub registrado_por_nome: Option<String>,
    pub data_registro: DateTime<Utc>,
}

/// Corpo de uma nova evolução.
#[derive(Deserialize)]
pub struct NovaEvolucao {
    pub descricao: String,
    pub tipo: String,
}

/// Orientação da equipe médica para o cuidador.
#[derive(Serialize, FromRow)]
pub struct Orientacao {
    pub id: i32,
    pub tipo: String,
    pub descricao: String,
}
