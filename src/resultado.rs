use std::collections::BTreeMap;

use crate::classificador::Programa;

/// Arredonda para 2 casas decimais (centavos).
pub fn arredondar2(valor: f64) -> f64 {
    (valor * 100.0).round() / 100.0
}

/// Formata um valor monetário no padrão pt-BR: "1.234.567,89".
pub fn formatar_moeda(valor: f64) -> String {
    let negativo = valor < 0.0;
    let valor = arredondar2(valor.abs());

    let inteiro = valor.trunc() as u64;
    let centavos = ((valor - valor.trunc()) * 100.0).round() as u64;

    // Agrupamento de milhares com pontos
    let digitos = inteiro.to_string();
    let mut agrupado = String::new();
    for (i, c) in digitos.chars().enumerate() {
        if i > 0 && (digitos.len() - i) % 3 == 0 {
            agrupado.push('.');
        }
        agrupado.push(c);
    }

    let sinal = if negativo { "-" } else { "" };
    format!("{sinal}{agrupado},{centavos:02}")
}

/// Resultado de um cálculo de incentivo: mapa plano de campos nomeados
/// para valores monetários.
///
/// O conjunto de campos varia por programa, mas o formato é uniforme e é
/// o contrato consumido pelo gerador de E115, pelo confronto e pela
/// exportação.
#[derive(Debug, Clone)]
pub struct ResultadoCalculo {
    programa: Programa,
    valores: BTreeMap<String, f64>,
}

impl ResultadoCalculo {
    pub fn novo(programa: Programa) -> Self {
        ResultadoCalculo {
            programa,
            valores: BTreeMap::new(),
        }
    }

    pub fn programa(&self) -> Programa {
        self.programa
    }

    /// Grava um campo, arredondado a centavos.
    pub fn definir(&mut self, campo: &str, valor: f64) {
        self.valores.insert(campo.to_string(), arredondar2(valor));
    }

    /// Valor de um campo; campos ausentes valem zero.
    pub fn valor(&self, campo: &str) -> f64 {
        self.valores.get(campo).copied().unwrap_or(0.0)
    }

    /// Campos presentes, em ordem alfabética.
    pub fn campos(&self) -> impl Iterator<Item = (&str, f64)> {
        self.valores.iter().map(|(campo, valor)| (campo.as_str(), *valor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campo_ausente_vale_zero() {
        let resultado = ResultadoCalculo::novo(Programa::Fomentar);
        assert_eq!(resultado.valor("qualquer_campo"), 0.0);
    }

    #[test]
    fn definir_arredonda_a_centavos() {
        let mut resultado = ResultadoCalculo::novo(Programa::Progoias);
        resultado.definir("credito", 10.005);
        assert_eq!(resultado.valor("credito"), 10.01);
    }

    #[test]
    fn formatacao_monetaria_pt_br() {
        assert_eq!(formatar_moeda(0.0), "0,00");
        assert_eq!(formatar_moeda(1234567.89), "1.234.567,89");
        assert_eq!(formatar_moeda(-45.5), "-45,50");
        assert_eq!(formatar_moeda(999.999), "1.000,00");
    }
}
