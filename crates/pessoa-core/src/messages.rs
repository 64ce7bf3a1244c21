//! User-facing messages (pt-BR) shared by the stores and the form logic.

pub const LOGIN_FAILED: &str = "Erro no login";
pub const LOGOUT_FAILED: &str = "Erro no logout";

pub const FETCH_FAILED: &str = "Erro ao buscar pessoas";
pub const CREATE_FAILED: &str = "Erro ao criar pessoa";
pub const UPDATE_FAILED: &str = "Erro ao atualizar pessoa";
pub const DELETE_FAILED: &str = "Erro ao deletar pessoa";
pub const LOAD_FAILED: &str = "Erro ao carregar dados da pessoa.";

pub const NAME_TOO_SHORT: &str = "O nome deve ter mais de 4 caracteres.";
pub const ADDRESS_REQUIRED: &str = "O endereço é obrigatório.";
pub const INVALID_BIRTH_DATE: &str = "Data de nascimento inválida.";
pub const LOOKUP_FAILED: &str = "Erro ao buscar pessoa por CPF";
