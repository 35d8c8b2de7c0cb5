// src/sessoes/mod.rs

// Declara o submódulo com o armazenamento de sessões em memória
pub mod sessao_store;
// Declara o submódulo com os extratores que protegem as rotas
pub mod guardas;
