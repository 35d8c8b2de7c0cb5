// src/shared/mod.rs

// Declara o submódulo com as structs compartilhadas entre as rotas
pub mod shared_structs;
// Declara o submódulo de configuração carregada do ambiente
pub mod config;
// Declara o submódulo com as validações de entrada (CPF, e-mail, telefone)
pub mod validacao;
// Declara o submódulo de armazenamento de arquivos enviados
pub mod uploads;
