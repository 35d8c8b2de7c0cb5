// src/cuidados/cuidados_router.rs

use actix_web::{post, web, HttpResponse};
use sqlx::{query, query_as};

// Importa as structs do módulo de cuidados
use super::cuidados_structs::{NovaEvolucao, NovoRegistroMedicacao, NovoSinalVital};
// O paciente do cuidador é resolvido sempre no servidor, pelo vínculo
use crate::pacientes::paciente_service;
// Guardas de sessão
use crate::sessoes::guardas::CuidadorAutenticado;
// Importa GenericResponse do módulo shared_structs
use crate::shared::shared_structs::GenericResponse;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

fn erro_interno(contexto: &str, erro: sqlx::Error) -> HttpResponse {
    tracing::error!("Erro ao {contexto}: {erro:?}");
    HttpResponse::InternalServerError().json(GenericResponse::erro("Erro interno ao registrar"))
}

/// Resolve o paciente atribuído ao cuidador ou devolve a resposta de erro.
async fn paciente_atribuido(
    data: &web::Data<AppState>,
    cuidador_id: i32,
) -> Result<i32, HttpResponse> {
    match paciente_service::paciente_do_cuidador(&data.db_pool, cuidador_id).await {
        Ok(Some(paciente)) => Ok(paciente.id),
        Ok(None) => Err(HttpResponse::NotFound()
            .json(GenericResponse::erro("Nenhum paciente atribuído a você"))),
        Err(e) => Err(erro_interno("buscar paciente atribuído", e)),
    }
}

/// Rota para o cuidador registrar uma medição de sinais vitais.
#[post("/sinais-vitais")]
pub async fn registrar_sinais_vitais(
    data: web::Data<AppState>,
    cuidador: CuidadorAutenticado,
    medicao: web::Json<NovoSinalVital>,
) -> HttpResponse {
    if medicao.pressao_arterial.trim().is_empty() {
        return HttpResponse::BadRequest()
            .json(GenericResponse::erro("Informe a pressão arterial"));
    }

    let cuidador_id = cuidador.0.usuario_id;
    let paciente_id = match paciente_atribuido(&data, cuidador_id).await {
        Ok(id) => id,
        Err(resposta) => return resposta,
    };

    let resultado = query(
        "INSERT INTO sinais_vitais \
         (paciente_id, pressao_arterial, frequencia_cardiaca, temperatura, glicemia, \
          saturacao_oxigenio, registrado_por) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(paciente_id)
    .bind(medicao.pressao_arterial.trim())
    .bind(medicao.frequencia_cardiaca)
    .bind(medicao.temperatura)
    .bind(medicao.glicemia)
    .bind(medicao.saturacao_oxigenio)
    .bind(cuidador_id)
    .execute(&data.db_pool)
    .await;

    match resultado {
        Ok(_) => HttpResponse::Ok()
            .json(GenericResponse::ok("Sinais vitais registrados com sucesso!")),
        Err(e) => erro_interno("registrar sinais vitais", e),
    }
}

/// Rota para o cuidador registrar a administração de uma medicação.
/// A medicação precisa pertencer ao paciente atribuído.
#[post("/medicacoes/registro")]
pub async fn registrar_medicacao(
    data: web::Data<AppState>,
    cuidador: CuidadorAutenticado,
    registro: web::Json<NovoRegistroMedicacao>,
) -> HttpResponse {
    let cuidador_id = cuidador.0.usuario_id;
    let paciente_id = match paciente_atribuido(&data, cuidador_id).await {
        Ok(id) => id,
        Err(resposta) => return resposta,
    };

    let medicacao = match query_as::<_, (i32,)>(
        "SELECT id FROM medicacoes WHERE id = $1 AND paciente_id = $2 AND status = 'ativo'",
    )
    .bind(registro.medicacao_id)
    .bind(paciente_id)
    .fetch_optional(&data.db_pool)
    .await
    {
        Ok(medicacao) => medicacao,
        Err(e) => return erro_interno("buscar medicação", e),
    };

    if medicacao.is_none() {
        return HttpResponse::NotFound().json(GenericResponse::erro(
            "Medicação não encontrada para o paciente atribuído",
        ));
    }

    let resultado = query(
        "INSERT INTO registro_medicamentos (medicacao_id, administrado_por, observacoes) \
         VALUES ($1, $2, $3)",
    )
    .bind(registro.medicacao_id)
    .bind(cuidador_id)
    .bind(registro.observacoes.as_deref().unwrap_or("").trim())
    .execute(&data.db_pool)
    .await;

    match resultado {
        Ok(_) => {
            HttpResponse::Ok().json(GenericResponse::ok("Medicação registrada com sucesso!"))
        }
        Err(e) => erro_interno("registrar medicação", e),
    }
}

/// Rota para o cuidador registrar uma nova evolução do paciente.
#[post("/evolucoes")]
pub async fn registrar_evolucao(
    data: web::Data<AppState>,
    cuidador: CuidadorAutenticado,
    evolucao: web::Json<NovaEvolucao>,
) -> HttpResponse {
    if evolucao.descricao.trim().is_empty() || evolucao.tipo.trim().is_empty() {
        return HttpResponse::BadRequest().json(GenericResponse::erro(
            "Preencha a descrição e o tipo da evolução",
        ));
    }

    let cuidador_id = cuidador.0.usuario_id;
    let paciente_id = match paciente_atribuido(&data, cuidador_id).await {
        Ok(id) => id,
        Err(resposta) => return resposta,
    };

    let resultado = query(
        "INSERT INTO evolucoes (paciente_id, descricao, tipo, registrado_por) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(paciente_id)
    .bind(evolucao.descricao.trim())
    .bind(evolucao.tipo.trim())
    .bind(cuidador_id)
    .execute(&data.db_pool)
    .await;

    match resultado {
        Ok(_) => {
            HttpResponse::Ok().json(GenericResponse::ok("Evolução registrada com sucesso!"))
        }
        Err(e) => erro_interno("registrar evolução", e),
    }
}
