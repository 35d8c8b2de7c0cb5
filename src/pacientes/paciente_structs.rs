// src/pacientes/paciente_structs.rs

use serde::Serialize;
use sqlx::FromRow;

use crate::agendamentos::agendamento_structs::Agendamento;
use crate::cuidados::cuidados_structs::{Evolucao, Medicacao, Orientacao, SinalVital};

/// Linha da tabela `pacientes` exibida nos perfis.
#[derive(Serialize, FromRow)]
pub struct Paciente {
    pub id: i32,
    pub nome: String,
    pub cpf: String,
    pub idade: i32,
    pub sexo: String,
    pub telefone: String,
    pub email: Option<String>,
    pub endereco: String,
    pub foto_identidade: String,
}

/// Paciente acompanhado do grau de parentesco do familiar logado.
#[derive(Serialize, FromRow)]
pub struct PacienteVinculado {
    pub id: i32,
    pub nome: String,
    pub cpf: String,
    pub idade: i32,
    pub sexo: String,
    pub telefone: String,
    pub email: Option<String>,
    pub endereco: String,
    pub foto_identidade: String,
    pub grau_parentesco: String,
}

/// Conteúdo da tela inicial do familiar.
#[derive(Serialize)]
pub struct PerfilFamiliar {
    pub paciente: PacienteVinculado,
    pub agendamentos: Vec<Agendamento>,
    pub sinais_vitais: Option<SinalVital>,
    pub evolucoes: Vec<Evolucao>,
    pub notificacoes_nao_lidas: i64,
}

/// Conteúdo da tela inicial do cuidador.
#[derive(Serialize)]
pub struct PerfilCuidador {
    pub paciente: Paciente,
    pub sinais_vitais: Option<SinalVital>,
    pub agenda_hoje: Vec<Agendamento>,
    pub medicacoes: Vec<Medicacao>,
    pub orientacoes: Vec<Orientacao>,
}

/// Histórico médico consolidado do paciente.
#[derive(Serialize)]
pub struct Historico {
    pub paciente: Paciente,
    pub total_sinais: i64,
    pub total_consultas_realizadas: i64,
    pub total_evolucoes: i64,
    pub evolucoes: Vec<Evolucao>,
}
