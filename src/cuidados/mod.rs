// src/cuidados/mod.rs

// Declara o submódulo com as structs de sinais vitais, medicações e evoluções
pub mod cuidados_structs;
// Declara o submódulo com as rotas de registro do cuidador
pub mod cuidados_router;
