// src/pacientes/mod.rs

// Declara o submódulo com as structs de paciente e das telas de perfil
pub mod paciente_structs;
// Declara o submódulo com as consultas de vínculo usuário-paciente
pub mod paciente_service;
// Declara o submódulo com as rotas de perfil e histórico
pub mod paciente_router;
