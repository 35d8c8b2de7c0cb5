// src/pacientes/paciente_service.rs

use sqlx::{query_as, Pool, Postgres};

use super::paciente_structs::{Paciente, PacienteVinculado};
use crate::usuarios::usuario_structs::TipoUsuario;

/// Paciente vinculado a um familiar, com o grau de parentesco.
pub async fn paciente_do_familiar(
    db: &Pool<Postgres>,
    usuario_id: i32,
) -> Result<Option<PacienteVinculado>, sqlx::Error> {
    query_as::<_, PacienteVinculado>(
        "SELECT p.id, p.nome, p.cpf, p.idade, p.sexo, p.telefone, p.email, \
                p.endereco, p.foto_identidade, vf.grau_parentesco \
         FROM pacientes p \
         INNER JOIN vinculos_familiar vf ON p.id = vf.paciente_id \
         WHERE vf.usuario_id = $1 \
         LIMIT 1",
    )
    .bind(usuario_id)
    .fetch_optional(db)
    .await
}

/// Paciente atribuído a um cuidador com vínculo ativo.
pub async fn paciente_do_cuidador(
    db: &Pool<Postgres>,
    cuidador_id: i32,
) -> Result<Option<Paciente>, sqlx::Error> {
    query_as::<_, Paciente>(
        "SELECT p.id, p.nome, p.cpf, p.idade, p.sexo, p.telefone, p.email, \
                p.endereco, p.foto_identidade \
         FROM pacientes p \
         INNER JOIN vinculos_cuidador vc ON p.id = vc.paciente_id \
         WHERE vc.cuidador_id = $1 AND vc.status = 'ativo' \
         LIMIT 1",
    )
    .bind(cuidador_id)
    .fetch_optional(db)
    .await
}

/// Resolve só o id do paciente ligado ao usuário, conforme o papel.
/// Admin não tem paciente vinculado.
pub async fn paciente_id_vinculado(
    db: &Pool<Postgres>,
    usuario_id: i32,
    tipo: TipoUsuario,
) -> Result<Option<i32>, sqlx::Error> {
    let consulta = match tipo {
        TipoUsuario::Familiar => {
            "SELECT p.id FROM pacientes p \
             INNER JOIN vinculos_familiar vf ON p.id = vf.paciente_id \
             WHERE vf.usuario_id = $1 \
             LIMIT 1"
        }
        TipoUsuario::Cuidador => {
            "SELECT p.id FROM pacientes p \
             INNER JOIN vinculos_cuidador vc ON p.id = vc.paciente_id \
             WHERE vc.cuidador_id = $1 AND vc.status = 'ativo' \
             LIMIT 1"
        }
        TipoUsuario::Admin => return Ok(None),
    };

    let linha = query_as::<_, (i32,)>(consulta)
        .bind(usuario_id)
        .fetch_optional(db)
        .await?;

    Ok(linha.map(|(id,)| id))
}
