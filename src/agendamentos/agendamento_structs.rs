// src/agendamentos/agendamento_structs.rs

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::uploads::ArquivoEnviado;

/// Serviço domiciliar oferecido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TipoServico {
    ConsultaMedica,
    Fisioterapia,
    Exames,
    Enfermagem,
    Emergencia,
}

impl TipoServico {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoServico::ConsultaMedica => "consulta-medica",
            TipoServico::Fisioterapia => "fisioterapia",
            TipoServico::Exames => "exames",
            TipoServico::Enfermagem => "enfermagem",
            TipoServico::Emergencia => "emergencia",
        }
    }
}

/// Período do dia pedido para a visita.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodo {
    Manha,
    Tarde,
    Noite,
}

impl Periodo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Periodo::Manha => "manha",
            Periodo::Tarde => "tarde",
            Periodo::Noite => "noite",
        }
    }
}

/// Nível de urgência informado pela família.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgencia {
    Rotina,
    Urgente,
    Emergencia,
}

impl Urgencia {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgencia::Rotina => "rotina",
            Urgencia::Urgente => "urgente",
            Urgencia::Emergencia => "emergencia",
        }
    }
}

/// Situação de um agendamento.
///
/// Todo agendamento nasce pendente. A equipe avança o estado, sempre
/// dentro das transições de `pode_transicionar`; o banco reforça o
/// domínio da coluna com um CHECK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusAgendamento {
    Pendente,
    Confirmado,
    Realizado,
    Cancelado,
}

impl StatusAgendamento {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusAgendamento::Pendente => "pendente",
            StatusAgendamento::Confirmado => "confirmado",
            StatusAgendamento::Realizado => "realizado",
            StatusAgendamento::Cancelado => "cancelado",
        }
    }

    /// Transições válidas: pendente → confirmado → realizado, com o
    /// desvio pendente|confirmado → cancelado.
    pub fn pode_transicionar(self, destino: StatusAgendamento) -> bool {
        matches!(
            (self, destino),
            (StatusAgendamento::Pendente, StatusAgendamento::Confirmado)
                | (StatusAgendamento::Confirmado, StatusAgendamento::Realizado)
                | (StatusAgendamento::Pendente, StatusAgendamento::Cancelado)
                | (StatusAgendamento::Confirmado, StatusAgendamento::Cancelado)
        )
    }
}

/// Corpo da solicitação pública de agendamento: dados do paciente,
/// dados da consulta e, opcionalmente, a foto da identidade.
#[derive(Deserialize)]
pub struct SolicitacaoAgendamento {
    pub nome: String,
    pub cpf: String,
    pub idade: i32,
    pub sexo: String,
    pub telefone: String,
    pub email: Option<String>,
    pub endereco: String,
    pub servico: TipoServico,
    pub data: NaiveDate,
    pub periodo: Periodo,
    pub urgencia: Option<Urgencia>,
    pub observacoes: Option<String>,
    pub identidade: Option<ArquivoEnviado>,
}

/// Identificadores criados (ou reaproveitados) pela solicitação.
#[derive(Serialize)]
pub struct AgendamentoCriado {
    pub agendamento_id: i32,
    pub paciente_id: i32,
}

/// Linha de `agendamentos` devolvida nas listagens dos perfis.
#[derive(Serialize, FromRow)]
pub struct Agendamento {
    pub id: i32,
    pub tipo_servico: String,
    pub data_agendamento: NaiveDate,
    pub horario: Option<NaiveTime>,
    pub periodo: String,
    pub urgencia: String,
    pub observacoes: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fluxo_normal_de_status() {
        assert!(StatusAgendamento::Pendente.pode_transicionar(StatusAgendamento::Confirmado));
        assert!(StatusAgendamento::Confirmado.pode_transicionar(StatusAgendamento::Realizado));
    }

    #[test]
    fn cancelamento_so_antes_de_realizado() {
        assert!(StatusAgendamento::Pendente.pode_transicionar(StatusAgendamento::Cancelado));
        assert!(StatusAgendamento::Confirmado.pode_transicionar(StatusAgendamento::Cancelado));
        assert!(!StatusAgendamento::Realizado.pode_transicionar(StatusAgendamento::Cancelado));
    }

    #[test]
    fn transicoes_invalidas_sao_rejeitadas() {
        assert!(!StatusAgendamento::Pendente.pode_transicionar(StatusAgendamento::Realizado));
        assert!(!StatusAgendamento::Realizado.pode_transicionar(StatusAgendamento::Pendente));
        assert!(!StatusAgendamento::Cancelado.pode_transicionar(StatusAgendamento::Confirmado));
        assert!(!StatusAgendamento::Cancelado.pode_transicionar(StatusAgendamento::Realizado));
        assert!(!StatusAgendamento::Pendente.pode_transicionar(StatusAgendamento::Pendente));
    }

    #[test]
    fn enums_desserializam_os_valores_do_formulario() {
        let solicitacao: SolicitacaoAgendamento = serde_json::from_str(
            r#"{
                "nome": "José da Silva",
                "cpf": "529.982.247-25",
                "idade": 78,
                "sexo": "masculino",
                "telefone": "(17) 99140-8891",
                "endereco": "Rua das Flores, 100, Centro",
                "servico": "consulta-medica",
                "data": "2099-01-15",
                "periodo": "manha",
                "urgencia": "urgente"
            }"#,
        )
        .unwrap();

        assert_eq!(solicitacao.servico, TipoServico::ConsultaMedica);
        assert_eq!(solicitacao.periodo, Periodo::Manha);
        assert_eq!(solicitacao.urgencia, Some(Urgencia::Urgente));
        assert!(solicitacao.identidade.is_none());
    }
}
