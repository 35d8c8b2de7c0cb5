// src/main.rs

use actix_web::{web, App, HttpServer};
use sqlx::{Pool, Postgres};
use tracing_subscriber::EnvFilter;

// Importa os módulos
mod agendamentos; // Agendamento domiciliar e envio de exames
mod cuidados;     // Registros do cuidador: sinais vitais, medicações, evoluções
mod pacientes;    // Pacientes, perfis e histórico
mod sessoes;      // Sessões em memória e guardas de rota
mod shared;       // Configuração, validações, uploads e respostas padrão
mod usuarios;     // Contas: cadastro, login, logout, troca de senha

use sessoes::sessao_store::SessaoStore;
use shared::config::AppConfig;

// Estado compartilhado: pool de conexões e configuração imutável do processo.
pub struct AppState {
    pub db_pool: Pool<Postgres>,
    pub config: AppConfig,
}

// Função principal da aplicação Actix Web.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Configuração lida uma única vez; depois disso só é consultada.
    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr.clone();

    // Conecta ao banco de dados PostgreSQL usando um pool de conexões.
    let db_pool = Pool::<Postgres>::connect(&config.database_url)
        .await
        .expect("Falha ao conectar ao banco PostgreSQL");

    // Estado compartilhado da aplicação.
    // web::Data é usado para compartilhar dados imutáveis entre as rotas.
    let app_state = web::Data::new(AppState { db_pool, config });

    // Armazenamento de sessões em memória, compartilhado pelos workers.
    let sessoes_state = web::Data::new(SessaoStore::new());

    tracing::info!("Iniciando API CuidarBem em {bind_addr}...");

    // Configura e inicia o servidor HTTP.
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(sessoes_state.clone())

            // Módulo de Usuários
            .service(usuarios::usuario_router::cadastrar_usuario)
            .service(usuarios::usuario_router::login_usuario)
            .service(usuarios::usuario_router::logout_usuario)
            .service(usuarios::usuario_router::alterar_senha)

            // Módulo de Agendamentos (rotas públicas)
            .service(agendamentos::agendamento_router::solicitar_agendamento)
            .service(agendamentos::agendamento_router::enviar_exame)

            // Módulo de Pacientes (perfis e histórico)
            .service(pacientes::paciente_router::perfil_familiar)
            .service(pacientes::paciente_router::perfil_cuidador)
            .service(pacientes::paciente_router::historico)

            // Módulo de Cuidados (registros do cuidador)
            .service(cuidados::cuidados_router::registrar_sinais_vitais)
            .service(cuidados::cuidados_router::registrar_medicacao)
            .service(cuidados::cuidados_router::registrar_evolucao)
    })
    // Vincula o servidor ao endereço configurado. O '?' propaga erros.
    .bind(bind_addr.as_str())?
    // Inicia o servidor.
    .run()
    // Aguarda a finalização do servidor.
    .await
}
