// src/pacientes/paciente_router.rs

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use sqlx::query_as;

// Importa as structs e consultas do módulo de pacientes
use super::paciente_service;
use super::paciente_structs::{Historico, Paciente, PerfilCuidador, PerfilFamiliar};
// Structs das listagens vêm dos módulos donos de cada tabela
use crate::agendamentos::agendamento_structs::Agendamento;
use crate::cuidados::cuidados_structs::{Evolucao, Medicacao, Orientacao, SinalVital};
// Guardas de sessão
use crate::sessoes::guardas::{CuidadorAutenticado, FamiliarAutenticado, UsuarioAutenticado};
use crate::usuarios::usuario_structs::TipoUsuario;
// Importa GenericResponse do módulo shared_structs
use crate::shared::shared_structs::GenericResponse;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

fn erro_interno(contexto: &str, erro: sqlx::Error) -> HttpResponse {
    tracing::error!("Erro ao {contexto}: {erro:?}");
    HttpResponse::InternalServerError().json(GenericResponse::erro("Erro interno ao carregar dados"))
}

/// Rota com os dados da tela inicial do familiar: paciente vinculado,
/// próximos agendamentos, última medição de sinais vitais, evoluções
/// recentes e o total de notificações não lidas.
#[get("/perfil/familiar")]
pub async fn perfil_familiar(
    data: web::Data<AppState>,
    familiar: FamiliarAutenticado,
) -> HttpResponse {
    let usuario_id = familiar.0.usuario_id;

    let paciente =
        match paciente_service::paciente_do_familiar(&data.db_pool, usuario_id).await {
            Ok(Some(paciente)) => paciente,
            Ok(None) => {
                return HttpResponse::NotFound().json(GenericResponse::erro(
                    "Nenhum paciente vinculado a esta conta",
                ))
            }
            Err(e) => return erro_interno("buscar paciente vinculado", e),
        };

    let agendamentos = match query_as::<_, Agendamento>(
        "SELECT id, tipo_servico, data_agendamento, horario, periodo, urgencia, observacoes, status \
         FROM agendamentos \
         WHERE paciente_id = $1 AND data_agendamento >= CURRENT_DATE \
         ORDER BY data_agendamento, horario \
         LIMIT 5",
    )
    .bind(paciente.id)
    .fetch_all(&data.db_pool)
    .await
    {
        Ok(agendamentos) => agendamentos,
        Err(e) => return erro_interno("buscar agendamentos", e),
    };

    let sinais_vitais = match query_as::<_, SinalVital>(
        "SELECT id, pressao_arterial, frequencia_cardiaca, temperatura, glicemia, \
                saturacao_oxigenio, data_medicao \
         FROM sinais_vitais \
         WHERE paciente_id = $1 \
         ORDER BY data_medicao DESC \
         LIMIT 1",
    )
    .bind(paciente.id)
    .fetch_optional(&data.db_pool)
    .await
    {
        Ok(sinais) => sinais,
        Err(e) => return erro_interno("buscar sinais vitais", e),
    };

    let evolucoes = match query_as::<_, Evolucao>(
        "SELECT e.id, e.descricao, e.tipo, u.nome AS registrado_por_nome, e.data_registro \
         FROM evolucoes e \
         LEFT JOIN usuarios u ON e.registrado_por = u.id \
         WHERE e.paciente_id = $1 \
         ORDER BY e.data_registro DESC \
         LIMIT 5",
    )
    .bind(paciente.id)
    .fetch_all(&data.db_pool)
    .await
    {
        Ok(evolucoes) => evolucoes,
        Err(e) => return erro_interno("buscar evoluções", e),
    };

    let notificacoes_nao_lidas = match query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM notificacoes WHERE usuario_id = $1 AND lida = FALSE",
    )
    .bind(usuario_id)
    .fetch_one(&data.db_pool)
    .await
    {
        Ok((total,)) => total,
        Err(e) => return erro_interno("contar notificações", e),
    };

    HttpResponse::Ok().json(PerfilFamiliar {
        paciente,
        agendamentos,
        sinais_vitais,
        evolucoes,
        notificacoes_nao_lidas,
    })
}

/// Rota com os dados da tela inicial do cuidador: paciente atribuído,
/// última medição, agenda de hoje, medicações ativas e orientações.
#[get("/perfil/cuidador")]
pub async fn perfil_cuidador(
    data: web::Data<AppState>,
    cuidador: CuidadorAutenticado,
) -> HttpResponse {
    let cuidador_id = cuidador.0.usuario_id;

    let paciente =
        match paciente_service::paciente_do_cuidador(&data.db_pool, cuidador_id).await {
            Ok(Some(paciente)) => paciente,
            Ok(None) => {
                return HttpResponse::NotFound()
                    .json(GenericResponse::erro("Nenhum paciente atribuído a você"))
            }
            Err(e) => return erro_interno("buscar paciente atribuído", e),
        };

    let sinais_vitais = match query_as::<_, SinalVital>(
        "SELECT id, pressao_arterial, frequencia_cardiaca, temperatura, glicemia, \
                saturacao_oxigenio, data_medicao \
         FROM sinais_vitais \
         WHERE paciente_id = $1 \
         ORDER BY data_medicao DESC \
         LIMIT 1",
    )
    .bind(paciente.id)
    .fetch_optional(&data.db_pool)
    .await
    {
        Ok(sinais) => sinais,
        Err(e) => return erro_interno("buscar sinais vitais", e),
    };

    let agenda_hoje = match query_as::<_, Agendamento>(
        "SELECT id, tipo_servico, data_agendamento, horario, periodo, urgencia, observacoes, status \
         FROM agendamentos \
         WHERE paciente_id = $1 AND data_agendamento = CURRENT_DATE \
         ORDER BY horario",
    )
    .bind(paciente.id)
    .fetch_all(&data.db_pool)
    .await
    {
        Ok(agenda) => agenda,
        Err(e) => return erro_interno("buscar agenda de hoje", e),
    };

    let medicacoes = match query_as::<_, Medicacao>(
        "SELECT m.id, m.nome, m.dosagem, m.horario_administracao, \
                (SELECT COUNT(*) FROM registro_medicamentos rm \
                 WHERE rm.medicacao_id = m.id \
                   AND rm.data_administracao::date = CURRENT_DATE) AS administrado_hoje \
         FROM medicacoes m \
         WHERE m.paciente_id = $1 AND m.status = 'ativo' \
         ORDER BY m.horario_administracao",
    )
    .bind(paciente.id)
    .fetch_all(&data.db_pool)
    .await
    {
        Ok(medicacoes) => medicacoes,
        Err(e) => return erro_interno("buscar medicações", e),
    };

    let orientacoes = match query_as::<_, Orientacao>(
        "SELECT id, tipo, descricao \
         FROM orientacoes \
         WHERE paciente_id = $1 AND status = 'ativo' \
         ORDER BY tipo, id",
    )
    .bind(paciente.id)
    .fetch_all(&data.db_pool)
    .await
    {
        Ok(orientacoes) => orientacoes,
        Err(e) => return erro_interno("buscar orientações", e),
    };

    HttpResponse::Ok().json(PerfilCuidador {
        paciente,
        sinais_vitais,
        agenda_hoje,
        medicacoes,
        orientacoes,
    })
}

/// Filtros aceitos pelo histórico: período em dias ('todos' desliga o
/// corte) e categoria de evolução ('todos' traz todas).
#[derive(Deserialize)]
pub struct FiltrosHistorico {
    pub periodo: Option<String>,
    pub categoria: Option<String>,
}

/// Rota com o histórico médico do paciente ligado ao usuário logado.
/// Familiar e cuidador enxergam apenas o próprio paciente.
#[get("/historico")]
pub async fn historico(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    filtros: web::Query<FiltrosHistorico>,
) -> HttpResponse {
    let sessao = usuario.0;

    if sessao.tipo == TipoUsuario::Admin {
        return HttpResponse::Forbidden()
            .json(GenericResponse::erro("Tipo de usuário não autorizado"));
    }

    let paciente_id = match paciente_service::paciente_id_vinculado(
        &data.db_pool,
        sessao.usuario_id,
        sessao.tipo,
    )
    .await
    {
        Ok(Some(id)) => id,
        Ok(None) => {
            return HttpResponse::Forbidden()
                .json(GenericResponse::erro("Nenhum paciente encontrado"))
        }
        Err(e) => return erro_interno("resolver paciente do usuário", e),
    };

    let paciente = match query_as::<_, Paciente>(
        "SELECT id, nome, cpf, idade, sexo, telefone, email, endereco, foto_identidade \
         FROM pacientes WHERE id = $1",
    )
    .bind(paciente_id)
    .fetch_one(&data.db_pool)
    .await
    {
        Ok(paciente) => paciente,
        Err(e) => return erro_interno("buscar paciente", e),
    };

    let total_sinais = match query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM sinais_vitais WHERE paciente_id = $1",
    )
    .bind(paciente_id)
    .fetch_one(&data.db_pool)
    .await
    {
        Ok((total,)) => total,
        Err(e) => return erro_interno("contar sinais vitais", e),
    };

    let total_consultas_realizadas = match query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM agendamentos WHERE paciente_id = $1 AND status = 'realizado'",
    )
    .bind(paciente_id)
    .fetch_one(&data.db_pool)
    .await
    {
        Ok((total,)) => total,
        Err(e) => return erro_interno("contar consultas realizadas", e),
    };

    let total_evolucoes = match query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM evolucoes WHERE paciente_id = $1",
    )
    .bind(paciente_id)
    .fetch_one(&data.db_pool)
    .await
    {
        Ok((total,)) => total,
        Err(e) => return erro_interno("contar evoluções", e),
    };

    // 'todos' desliga o corte por período; valor ausente ou inválido usa
    // os últimos 30 dias.
    let dias: Option<i32> = match filtros.periodo.as_deref() {
        Some("todos") => None,
        Some(valor) => Some(valor.parse().unwrap_or(30)),
        None => Some(30),
    };

    let categoria = filtros
        .categoria
        .as_deref()
        .filter(|c| *c != "todos" && !c.is_empty())
        .map(str::to_string);

    let evolucoes = match query_as::<_, Evolucao>(
        "SELECT e.id, e.descricao, e.tipo, u.nome AS registrado_por_nome, e.data_registro \
         FROM evolucoes e \
         LEFT JOIN usuarios u ON e.registrado_por = u.id \
         WHERE e.paciente_id = $1 \
           AND ($2::int IS NULL OR e.data_registro >= NOW() - make_interval(days => $2)) \
           AND ($3::text IS NULL OR e.tipo = $3) \
         ORDER BY e.data_registro DESC \
         LIMIT 50",
    )
    .bind(paciente_id)
    .bind(dias)
    .bind(categoria)
    .fetch_all(&data.db_pool)
    .await
    {
        Ok(evolucoes) => evolucoes,
        Err(e) => return erro_interno("buscar histórico de evoluções", e),
    };

    HttpResponse::Ok().json(Historico {
        paciente,
        total_sinais,
        total_consultas_realizadas,
        total_evolucoes,
        evolucoes,
    })
}
