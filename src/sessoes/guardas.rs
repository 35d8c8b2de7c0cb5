// src/sessoes/guardas.rs

use actix_web::{
    dev::Payload,
    http::header,
    web, FromRequest, HttpRequest, HttpResponse, ResponseError,
};

use futures::future::{ready, Ready};

use super::sessao_store::{Sessao, SessaoStore, COOKIE_SESSAO};
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::usuario_structs::TipoUsuario;

/// Falha de acesso a uma rota protegida.
///
/// Sem sessão ativa, a resposta é um redirecionamento para o login
/// carregando a URL de retorno; com sessão do tipo errado, para a página
/// de acesso negado. O corpo do handler protegido nunca executa.
#[derive(Debug, thiserror::Error)]
pub enum GuardaErro {
    #[error("Faça login para acessar esta página")]
    NaoAutenticado { destino: String },
    #[error("Você não tem permissão para acessar esta página")]
    SemPermissao,
    #[error("Erro de configuração do servidor")]
    Configuracao,
}

impl ResponseError for GuardaErro {
    fn error_response(&self) -> HttpResponse {
        match self {
            GuardaErro::NaoAutenticado { destino } => HttpResponse::SeeOther()
                .insert_header((
                    header::LOCATION,
                    format!("/login?redirect={}", urlencoding::encode(destino)),
                ))
                .finish(),
            GuardaErro::SemPermissao => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/sem-permissao"))
                .finish(),
            GuardaErro::Configuracao => HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro de configuração do servidor")),
        }
    }
}

/// Resolve a sessão da requisição a partir do cookie e do armazenamento.
fn sessao_da_requisicao(req: &HttpRequest) -> Result<Sessao, GuardaErro> {
    let sessoes = match req.app_data::<web::Data<SessaoStore>>() {
        Some(store) => store,
        None => {
            tracing::error!("SessaoStore não disponível no extrator de sessão");
            return Err(GuardaErro::Configuracao);
        }
    };

    let cookie = req
        .cookie(COOKIE_SESSAO)
        .ok_or_else(|| nao_autenticado(req))?;

    sessoes
        .obter(cookie.value())
        .ok_or_else(|| nao_autenticado(req))
}

fn nao_autenticado(req: &HttpRequest) -> GuardaErro {
    GuardaErro::NaoAutenticado {
        destino: req.uri().to_string(),
    }
}

/// Extrator que exige qualquer sessão autenticada.
#[derive(Debug, Clone)]
pub struct UsuarioAutenticado(pub Sessao);

impl FromRequest for UsuarioAutenticado {
    type Error = GuardaErro;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(sessao_da_requisicao(req).map(UsuarioAutenticado))
    }
}

/// Extrator que exige sessão de familiar.
#[derive(Debug, Clone)]
pub struct FamiliarAutenticado(pub Sessao);

impl FromRequest for FamiliarAutenticado {
    type Error = GuardaErro;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            sessao_da_requisicao(req).and_then(|sessao| {
                if sessao.tem_tipo(&[TipoUsuario::Familiar]) {
                    Ok(FamiliarAutenticado(sessao))
                } else {
                    Err(GuardaErro::SemPermissao)
                }
            }),
        )
    }
}

/// Extrator que exige sessão de cuidador.
#[derive(Debug, Clone)]
pub struct CuidadorAutenticado(pub Sessao);

impl FromRequest for CuidadorAutenticado {
    type Error = GuardaErro;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            sessao_da_requisicao(req).and_then(|sessao| {
                if sessao.tem_tipo(&[TipoUsuario::Cuidador]) {
                    Ok(CuidadorAutenticado(sessao))
                } else {
                    Err(GuardaErro::SemPermissao)
                }
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    fn sessao(tipo: TipoUsuario) -> Sessao {
        Sessao {
            usuario_id: 7,
            nome: "João".to_string(),
            email: "joao.silva@email.com".to_string(),
            tipo,
        }
    }

    async fn rota_protegida(_usuario: UsuarioAutenticado) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn rota_de_cuidador(_cuidador: CuidadorAutenticado) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn sem_sessao_redireciona_para_login_com_retorno() {
        let sessoes = web::Data::new(SessaoStore::new());
        let app = test::init_service(
            App::new()
                .app_data(sessoes)
                .route("/historico", web::get().to(rota_protegida)),
        )
        .await;

        let resposta =
            test::call_service(&app, test::TestRequest::get().uri("/historico").to_request())
                .await;

        assert_eq!(resposta.status(), StatusCode::SEE_OTHER);
        let destino = resposta
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(destino, "/login?redirect=%2Fhistorico");
    }

    #[actix_web::test]
    async fn token_desconhecido_nao_passa() {
        let sessoes = web::Data::new(SessaoStore::new());
        let app = test::init_service(
            App::new()
                .app_data(sessoes)
                .route("/historico", web::get().to(rota_protegida)),
        )
        .await;

        let requisicao = test::TestRequest::get()
            .uri("/historico")
            .cookie(Cookie::new(COOKIE_SESSAO, "token-forjado"))
            .to_request();
        let resposta = test::call_service(&app, requisicao).await;

        assert_eq!(resposta.status(), StatusCode::SEE_OTHER);
    }

    #[actix_web::test]
    async fn sessao_valida_libera_a_rota() {
        let sessoes = web::Data::new(SessaoStore::new());
        let token = sessoes.criar(sessao(TipoUsuario::Familiar));

        let app = test::init_service(
            App::new()
                .app_data(sessoes)
                .route("/historico", web::get().to(rota_protegida)),
        )
        .await;

        let requisicao = test::TestRequest::get()
            .uri("/historico")
            .cookie(Cookie::new(COOKIE_SESSAO, token))
            .to_request();
        let resposta = test::call_service(&app, requisicao).await;

        assert_eq!(resposta.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn tipo_errado_redireciona_para_sem_permissao() {
        let sessoes = web::Data::new(SessaoStore::new());
        let token = sessoes.criar(sessao(TipoUsuario::Familiar));

        let app = test::init_service(
            App::new()
                .app_data(sessoes)
                .route("/perfil/cuidador", web::get().to(rota_de_cuidador)),
        )
        .await;

        let requisicao = test::TestRequest::get()
            .uri("/perfil/cuidador")
            .cookie(Cookie::new(COOKIE_SESSAO, token))
            .to_request();
        let resposta = test::call_service(&app, requisicao).await;

        assert_eq!(resposta.status(), StatusCode::SEE_OTHER);
        let destino = resposta
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(destino, "/sem-permissao");
    }

    #[actix_web::test]
    async fn cuidador_acessa_rota_de_cuidador() {
        let sessoes = web::Data::new(SessaoStore::new());
        let token = sessoes.criar(sessao(TipoUsuario::Cuidador));

        let app = test::init_service(
            App::new()
                .app_data(sessoes)
                .route("/perfil/cuidador", web::get().to(rota_de_cuidador)),
        )
        .await;

        let requisicao = test::TestRequest::get()
            .uri("/perfil/cuidador")
            .cookie(Cookie::new(COOKIE_SESSAO, token))
            .to_request();
        let resposta = test::call_service(&app, requisicao).await;

        assert_eq!(resposta.status(), StatusCode::OK);
    }
}
