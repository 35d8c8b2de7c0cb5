// src/agendamentos/agendamento_service.rs

use chrono::Local;
use sqlx::{Pool, Postgres, Row, Transaction};

use super::agendamento_structs::{AgendamentoCriado, SolicitacaoAgendamento, Urgencia};
use crate::shared::config::AppConfig;
use crate::shared::uploads::{self, UploadError};
use crate::shared::validacao::{limpar_digitos, validar_cpf, validar_email};

/// Falhas da solicitação de agendamento. Problemas de banco viram a
/// variante genérica `Falha`; o detalhe vai para o log.
#[derive(Debug, thiserror::Error)]
pub enum AgendamentoError {
    #[error("{0}")]
    Validacao(String),
    #[error("CPF inválido")]
    CpfInvalido,
    #[error("Data de agendamento não pode ser no passado")]
    DataNoPassado,
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("Erro ao processar agendamento. Tente novamente")]
    Falha,
}

fn falha(contexto: &str, erro: sqlx::Error) -> AgendamentoError {
    tracing::error!("Erro ao {contexto}: {erro:?}");
    AgendamentoError::Falha
}

/// Processa uma solicitação pública de agendamento.
///
/// Valida tudo antes de qualquer efeito; grava o documento de identidade
/// fora da transação (arquivo em disco não participa do rollback); e só
/// então abre a transação que resolve o paciente e insere o agendamento.
/// Qualquer falha depois do `begin` desfaz as duas escritas juntas.
pub async fn solicitar_agendamento(
    db: &Pool<Postgres>,
    config: &AppConfig,
    solicitacao: &SolicitacaoAgendamento,
) -> Result<AgendamentoCriado, AgendamentoError> {
    // 1. Campos obrigatórios
    let obrigatorios = [
        &solicitacao.nome,
        &solicitacao.sexo,
        &solicitacao.telefone,
        &solicitacao.endereco,
    ];
    if obrigatorios.iter().any(|campo| campo.trim().is_empty()) {
        return Err(AgendamentoError::Validacao(
            "Preencha todos os campos obrigatórios".to_string(),
        ));
    }

    if !validar_cpf(&solicitacao.cpf) {
        return Err(AgendamentoError::CpfInvalido);
    }

    if !(1..=120).contains(&solicitacao.idade) {
        return Err(AgendamentoError::Validacao("Idade inválida".to_string()));
    }

    if let Some(email) = solicitacao.email.as_deref() {
        if !email.trim().is_empty() && !validar_email(email) {
            return Err(AgendamentoError::Validacao("Email inválido".to_string()));
        }
    }

    // 2. A data não pode ser no passado
    if solicitacao.data < Local::now().date_naive() {
        return Err(AgendamentoError::DataNoPassado);
    }

    // 3. Upload da identidade, antes da transação
    let foto_identidade = match &solicitacao.identidade {
        Some(arquivo) => uploads::gravar_arquivo(
            &config.upload_dir,
            config.max_upload_size,
            "identidades",
            arquivo,
        )?,
        None => String::new(),
    };

    // 4. Transação: paciente + agendamento entram juntos ou nenhum entra.
    // Em caso de erro o drop da transação faz o rollback.
    let mut transaction = db.begin().await.map_err(|e| falha("iniciar transação", e))?;

    let cpf_limpo = limpar_digitos(&solicitacao.cpf);
    let paciente_id =
        resolver_paciente(&mut transaction, &cpf_limpo, solicitacao, &foto_identidade).await?;

    let agendamento_id = sqlx::query(
        "INSERT INTO agendamentos \
         (paciente_id, tipo_servico, data_agendamento, periodo, urgencia, observacoes, status) \
         VALUES ($1, $2, $3, $4, $5, $6, 'pendente') RETURNING id",
    )
    .bind(paciente_id)
    .bind(solicitacao.servico.as_str())
    .bind(solicitacao.data)
    .bind(solicitacao.periodo.as_str())
    .bind(solicitacao.urgencia.unwrap_or(Urgencia::Rotina).as_str())
    .bind(solicitacao.observacoes.as_deref().unwrap_or("").trim())
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| falha("inserir agendamento", e))?
    .try_get::<i32, _>("id")
    .map_err(|e| falha("obter id do agendamento", e))?;

    transaction
        .commit()
        .await
        .map_err(|e| falha("confirmar transação", e))?;

    Ok(AgendamentoCriado {
        agendamento_id,
        paciente_id,
    })
}

/// Resolve o paciente pelo CPF dentro da transação.
///
/// Paciente já cadastrado é reaproveitado e seus dados não são
/// sobrescritos. Na inserção, o ON CONFLICT cobre a corrida entre duas
/// solicitações simultâneas com o mesmo CPF: quem perder a inserção relê
/// a linha do vencedor, e nunca existem dois pacientes com um CPF.
async fn resolver_paciente(
    transaction: &mut Transaction<'_, Postgres>,
    cpf: &str,
    solicitacao: &SolicitacaoAgendamento,
    foto_identidade: &str,
) -> Result<i32, AgendamentoError> {
    let existente = sqlx::query("SELECT id FROM pacientes WHERE cpf = $1")
        .bind(cpf)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|e| falha("buscar paciente", e))?;

    if let Some(linha) = existente {
        return linha
            .try_get::<i32, _>("id")
            .map_err(|e| falha("ler id do paciente", e));
    }

    let email = solicitacao
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());

    let inserido = sqlx::query(
        "INSERT INTO pacientes \
         (nome, cpf, idade, sexo, telefone, email, endereco, foto_identidade) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (cpf) DO NOTHING RETURNING id",
    )
    .bind(solicitacao.nome.trim())
    .bind(cpf)
    .bind(solicitacao.idade)
    .bind(solicitacao.sexo.trim())
    .bind(limpar_digitos(&solicitacao.telefone))
    .bind(email)
    .bind(solicitacao.endereco.trim())
    .bind(foto_identidade)
    .fetch_optional(&mut *transaction)
    .await
    .map_err(|e| falha("inserir paciente", e))?;

    if let Some(linha) = inserido {
        return linha
            .try_get::<i32, _>("id")
            .map_err(|e| falha("ler id do paciente inserido", e));
    }

    // Outra solicitação inseriu primeiro; usa a linha dela.
    sqlx::query("SELECT id FROM pacientes WHERE cpf = $1")
        .bind(cpf)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|e| falha("reler paciente após conflito", e))?
        .try_get::<i32, _>("id")
        .map_err(|e| falha("ler id do paciente", e))
}
