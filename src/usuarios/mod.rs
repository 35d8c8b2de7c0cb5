// src/usuarios/mod.rs

// Declara o submódulo que contém as definições das structs de usuários
pub mod usuario_structs;
// Declara o submódulo com as regras de login, cadastro e troca de senha
pub mod usuario_service;
// Declara o submódulo que contém as funções de rota relacionadas a usuários
pub mod usuario_router;
