// src/agendamentos/mod.rs

// Declara o submódulo com as structs e enumerações de agendamento
pub mod agendamento_structs;
// Declara o submódulo com a transação de cadastro de paciente + agendamento
pub mod agendamento_service;
// Declara o submódulo com as rotas públicas de agendamento e envio de exames
pub mod agendamento_router;
