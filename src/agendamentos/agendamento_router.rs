// src/agendamentos/agendamento_router.rs

use actix_web::{post, web, HttpResponse};

// Importa o serviço e as structs do módulo de agendamentos
use super::agendamento_service::{self, AgendamentoError};
use super::agendamento_structs::SolicitacaoAgendamento;
// Upload avulso de exames usa o mesmo armazenamento de arquivos
use crate::shared::uploads::{self, ArquivoEnviado, UploadError};
// Importa GenericResponse do módulo shared_structs
use crate::shared::shared_structs::GenericResponse;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Rota pública para solicitar um agendamento domiciliar.
///
/// Cadastra o paciente na primeira solicitação e reaproveita o cadastro
/// nas seguintes; o agendamento entra sempre como pendente e a equipe
/// confirma o horário depois.
#[post("/agendamento")]
pub async fn solicitar_agendamento(
    data: web::Data<AppState>,
    solicitacao: web::Json<SolicitacaoAgendamento>,
) -> HttpResponse {
    match agendamento_service::solicitar_agendamento(&data.db_pool, &data.config, &solicitacao)
        .await
    {
        Ok(criado) => HttpResponse::Ok().json(GenericResponse::sucesso(
            "Agendamento solicitado com sucesso! Nossa equipe entrará em contato \
             em até 2 horas para confirmar o horário.",
            criado,
        )),
        Err(AgendamentoError::Falha) => HttpResponse::InternalServerError()
            .json(GenericResponse::erro(AgendamentoError::Falha.to_string())),
        Err(AgendamentoError::Upload(UploadError::Io(erro))) => {
            tracing::error!("Erro de E/S ao gravar identidade: {erro:?}");
            HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro ao enviar documento"))
        }
        Err(erro) => HttpResponse::BadRequest().json(GenericResponse::erro(format!(
            "Erro ao processar agendamento: {erro}"
        ))),
    }
}

/// Rota pública para envio avulso de exames e laudos.
/// Não grava nada no banco; só valida e armazena o arquivo.
#[post("/exames")]
pub async fn enviar_exame(
    data: web::Data<AppState>,
    arquivo: web::Json<ArquivoEnviado>,
) -> HttpResponse {
    match uploads::gravar_arquivo(
        &data.config.upload_dir,
        data.config.max_upload_size,
        "exames",
        &arquivo,
    ) {
        Ok(_) => HttpResponse::Ok().json(GenericResponse::ok(
            "Documento enviado com sucesso! Nosso time médico irá analisá-lo.",
        )),
        Err(UploadError::Io(erro)) => {
            tracing::error!("Erro de E/S ao gravar exame: {erro:?}");
            HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro ao enviar documento"))
        }
        Err(erro) => HttpResponse::BadRequest()
            .json(GenericResponse::erro(format!("Erro ao enviar documento: {erro}"))),
    }
}
