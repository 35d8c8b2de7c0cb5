// src/usuarios/usuario_router.rs

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{http::header, post, web, HttpRequest, HttpResponse};
use serde_json;

// Importa as structs e o serviço do módulo de usuários
use super::usuario_service::{self, AuthError};
use super::usuario_structs::{AlterarSenhaRequest, AuthResponse, LoginRequest, NovoUsuario};
// Sessões: armazenamento, cookie e guardas
use crate::sessoes::guardas::UsuarioAutenticado;
use crate::sessoes::sessao_store::{Sessao, SessaoStore, COOKIE_SESSAO};
// Importa GenericResponse do módulo shared_structs
use crate::shared::shared_structs::GenericResponse;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Converte uma falha do serviço de contas na resposta HTTP adequada.
fn resposta_de_erro(erro: AuthError) -> HttpResponse {
    let mensagem = erro.to_string();
    match erro {
        AuthError::CredenciaisInvalidas
        | AuthError::TipoIncorreto { .. }
        | AuthError::SenhaAtualIncorreta => {
            HttpResponse::Unauthorized().json(GenericResponse::erro(mensagem))
        }
        AuthError::Interno => {
            HttpResponse::InternalServerError().json(GenericResponse::erro(mensagem))
        }
        _ => HttpResponse::BadRequest().json(GenericResponse::erro(mensagem)),
    }
}

/// Rota para cadastrar um novo usuário (familiar ou cuidador).
#[post("/usuarios/cadastro")]
pub async fn cadastrar_usuario(
    data: web::Data<AppState>,
    novo_usuario: web::Json<NovoUsuario>,
) -> HttpResponse {
    match usuario_service::registrar(&data.db_pool, &novo_usuario).await {
        Ok(id) => HttpResponse::Ok().json(GenericResponse::sucesso(
            "Usuário cadastrado com sucesso",
            serde_json::json!({ "id": id }),
        )),
        Err(erro) => resposta_de_erro(erro),
    }
}

/// Rota para login de usuário.
///
/// A sessão só é criada depois que credenciais E tipo informado conferem;
/// o token anterior da requisição, se houver, é descartado para que cada
/// login comece com um token novo.
#[post("/usuarios/login")]
pub async fn login_usuario(
    data: web::Data<AppState>,
    sessoes: web::Data<SessaoStore>,
    req: HttpRequest,
    login_request: web::Json<LoginRequest>,
) -> HttpResponse {
    if let Some(cookie) = req.cookie(COOKIE_SESSAO) {
        sessoes.destruir(cookie.value());
    }

    let usuario = match usuario_service::login(
        &data.db_pool,
        &login_request.email,
        &login_request.senha,
        login_request.tipo,
    )
    .await
    {
        Ok(usuario) => usuario,
        Err(erro) => return resposta_de_erro(erro),
    };

    let token = sessoes.criar(Sessao {
        usuario_id: usuario.id,
        nome: usuario.nome.clone(),
        email: usuario.email.clone(),
        tipo: usuario.tipo,
    });

    let cookie = Cookie::build(COOKIE_SESSAO, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();

    HttpResponse::Ok().cookie(cookie).json(AuthResponse {
        status: "success".to_string(),
        message: "Login bem-sucedido!".to_string(),
        user_id: usuario.id,
        user_name: usuario.nome,
        user_email: usuario.email,
        tipo: usuario.tipo,
    })
}

/// Rota de logout. Idempotente: sem sessão ativa é um no-op.
/// Sempre redireciona para a página pública inicial.
#[post("/usuarios/logout")]
pub async fn logout_usuario(sessoes: web::Data<SessaoStore>, req: HttpRequest) -> HttpResponse {
    if let Some(cookie) = req.cookie(COOKIE_SESSAO) {
        sessoes.destruir(cookie.value());
    }

    // Expira o cookie no navegador; o token já não existe no servidor.
    let cookie_removido = Cookie::build(COOKIE_SESSAO, "")
        .path("/")
        .http_only(true)
        .max_age(Duration::ZERO)
        .finish();

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(cookie_removido)
        .finish()
}

/// Rota para o usuário logado trocar a própria senha.
#[post("/usuarios/alterar-senha")]
pub async fn alterar_senha(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    corpo: web::Json<AlterarSenhaRequest>,
) -> HttpResponse {
    match usuario_service::alterar_senha(
        &data.db_pool,
        usuario.0.usuario_id,
        &corpo.senha_atual,
        &corpo.senha_nova,
    )
    .await
    {
        Ok(()) => HttpResponse::Ok().json(GenericResponse::ok("Senha alterada com sucesso")),
        Err(erro) => resposta_de_erro(erro),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    use crate::usuarios::usuario_structs::TipoUsuario;

    #[actix_web::test]
    async fn logout_redireciona_e_destroi_a_sessao() {
        let sessoes = web::Data::new(SessaoStore::new());
        let token = sessoes.criar(Sessao {
            usuario_id: 1,
            nome: "Maria".to_string(),
            email: "maria.familiar@email.com".to_string(),
            tipo: TipoUsuario::Familiar,
        });

        let app = test::init_service(
            App::new()
                .app_data(sessoes.clone())
                .service(logout_usuario),
        )
        .await;

        let requisicao = test::TestRequest::post()
            .uri("/usuarios/logout")
            .cookie(actix_web::cookie::Cookie::new(COOKIE_SESSAO, token.clone()))
            .to_request();
        let resposta = test::call_service(&app, requisicao).await;

        assert_eq!(resposta.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resposta.headers().get(header::LOCATION).unwrap(),
            "/"
        );
        // O token não pode mais ser usado.
        assert!(sessoes.obter(&token).is_none());
    }

    #[actix_web::test]
    async fn logout_sem_sessao_tambem_redireciona() {
        let sessoes = web::Data::new(SessaoStore::new());
        let app = test::init_service(
            App::new()
                .app_data(sessoes)
                .service(logout_usuario),
        )
        .await;

        // Duas chamadas seguidas sem cookie: ambas respondem igual.
        for _ in 0..2 {
            let resposta = test::call_service(
                &app,
                test::TestRequest::post().uri("/usuarios/logout").to_request(),
            )
            .await;
            assert_eq!(resposta.status(), StatusCode::SEE_OTHER);
        }
    }
}
