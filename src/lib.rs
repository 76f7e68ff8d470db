mod args;
mod classificador;
mod confronto;
mod e115;
mod error;
mod fomentar;
mod logproduzir;
mod parser;
mod progoias;
mod regex;
mod resultado;
mod tabelas;

pub use self::{
    args::*, classificador::*, confronto::*, e115::*, error::*, fomentar::*, logproduzir::*,
    parser::*, progoias::*, regex::*, resultado::*, tabelas::*,
};
