use crate::{
    classificador::parse_valor,
    parser::Escrituracao,
    resultado::{ResultadoCalculo, arredondar2},
    tabelas::codigos_e115,
};

/// Registro E115: código de informação adicional da apuração estadual.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistroE115 {
    pub codigo: String,
    pub descricao: String,
    pub valor: f64,
}

/// Gera os 54 registros E115 (GO200001..GO200054) do programa do
/// resultado, em ordem ascendente de código.
///
/// Campos sem valor no resultado geram registro com valor zero; a
/// sequência tem sempre 54 entradas.
pub fn gerar_registro_e115(resultado: &ResultadoCalculo) -> Vec<RegistroE115> {
    let registros: Vec<RegistroE115> = codigos_e115(resultado.programa())
        .iter()
        .map(|(codigo, descricao, campo)| RegistroE115 {
            codigo: (*codigo).to_string(),
            descricao: (*descricao).to_string(),
            valor: arredondar2(resultado.valor(campo)),
        })
        .collect();

    log::info!(
        "E115 gerado: {} registros para {}",
        registros.len(),
        resultado.programa()
    );

    registros
}

/// Extrai os registros E115 declarados na escrituração, restritos aos
/// códigos GO200xxx dos programas de incentivo.
pub fn extrair_e115_do_sped(escrituracao: &Escrituracao) -> Vec<RegistroE115> {
    let declarados: Vec<RegistroE115> = escrituracao
        .registros("E115")
        .iter()
        .filter_map(|registro| {
            let codigo = registro.get(1).map(String::as_str).unwrap_or("");
            if !codigo.starts_with("GO200") {
                return None;
            }
            Some(RegistroE115 {
                codigo: codigo.to_string(),
                valor: registro.get(2).map_or(0.0, |c| parse_valor(c)),
                descricao: registro.get(3).cloned().unwrap_or_default(),
            })
        })
        .collect();

    log::info!("Extraídos {} registros E115 do SPED", declarados.len());
    declarados
}

/// Situação de um código no confronto calculado vs declarado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SituacaoConfronto {
    Coincide,
    Diverge,
    AusenteNoSped,
    ExtraNoSped,
}

#[derive(Debug, Clone)]
pub struct ItemConfrontoE115 {
    pub codigo: String,
    pub descricao: String,
    pub valor_calculado: f64,
    pub valor_declarado: f64,
    pub diferenca: f64,
    pub situacao: SituacaoConfronto,
}

/// Resultado do confronto E115, com itens por código e totais agregados.
#[derive(Debug, Clone, Default)]
pub struct ConfrontoE115 {
    pub itens: Vec<ItemConfrontoE115>,
    pub coincidencias: usize,
    pub divergencias: usize,
    pub ausentes_no_sped: usize,
    pub extras_no_sped: usize,
    pub total_calculado: f64,
    pub total_declarado: f64,
    pub percentual_coincidencia: f64,
}

/// Tolerância de um centavo na comparação de valores monetários.
const TOLERANCIA: f64 = 0.01;

/// Compara, código a código, os E115 calculados com os declarados no
/// arquivo. Usado para auditoria, não altera o cálculo.
pub fn confrontar_e115(
    calculados: &[RegistroE115],
    declarados: &[RegistroE115],
) -> ConfrontoE115 {
    let mut confronto = ConfrontoE115::default();

    for calculado in calculados {
        confronto.total_calculado += calculado.valor;

        let declarado = declarados.iter().find(|d| d.codigo == calculado.codigo);
        let item = match declarado {
            Some(declarado) => {
                let diferenca = calculado.valor - declarado.valor;
                let situacao = if diferenca.abs() < TOLERANCIA {
                    confronto.coincidencias += 1;
                    SituacaoConfronto::Coincide
                } else {
                    confronto.divergencias += 1;
                    SituacaoConfronto::Diverge
                };
                ItemConfrontoE115 {
                    codigo: calculado.codigo.clone(),
                    descricao: calculado.descricao.clone(),
                    valor_calculado: calculado.valor,
                    valor_declarado: declarado.valor,
                    diferenca,
                    situacao,
                }
            }
            None => {
                confronto.ausentes_no_sped += 1;
                ItemConfrontoE115 {
                    codigo: calculado.codigo.clone(),
                    descricao: calculado.descricao.clone(),
                    valor_calculado: calculado.valor,
                    valor_declarado: 0.0,
                    diferenca: calculado.valor,
                    situacao: SituacaoConfronto::AusenteNoSped,
                }
            }
        };
        confronto.itens.push(item);
    }

    for declarado in declarados {
        confronto.total_declarado += declarado.valor;

        if !calculados.iter().any(|c| c.codigo == declarado.codigo) {
            confronto.extras_no_sped += 1;
            confronto.itens.push(ItemConfrontoE115 {
                codigo: declarado.codigo.clone(),
                descricao: declarado.descricao.clone(),
                valor_calculado: 0.0,
                valor_declarado: declarado.valor,
                diferenca: -declarado.valor,
                situacao: SituacaoConfronto::ExtraNoSped,
            });
        }
    }

    confronto.percentual_coincidencia = if calculados.is_empty() {
        0.0
    } else {
        confronto.coincidencias as f64 / calculados.len() as f64 * 100.0
    };

    log::info!(
        "Confronto E115: {} coincidências, {} divergências, {} ausentes, {} extras",
        confronto.coincidencias,
        confronto.divergencias,
        confronto.ausentes_no_sped,
        confronto.extras_no_sped
    );

    confronto
}

/// Renderiza os registros E115 no formato de texto SPED:
/// `|E115|<código>|<valor com vírgula>|<descrição>|`.
pub fn gerar_texto_sped(registros: &[RegistroE115]) -> String {
    registros
        .iter()
        .map(|registro| {
            let valor = format!("{:.2}", arredondar2(registro.valor)).replace('.', ",");
            format!("|E115|{}|{}|{}|\n", registro.codigo, valor, registro.descricao)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classificador::Programa;
    use crate::parser::ler_sped_completo;

    #[test]
    fn geracao_sempre_produz_54_registros_em_ordem() {
        // Resultado sem nenhum campo definido: todos os valores zeram
        let resultado = ResultadoCalculo::novo(Programa::Fomentar);
        let registros = gerar_registro_e115(&resultado);

        assert_eq!(registros.len(), 54);
        assert!(registros.iter().all(|r| r.valor == 0.0));
        for par in registros.windows(2) {
            assert!(par[0].codigo < par[1].codigo);
        }
        assert_eq!(registros[0].codigo, "GO200001");
        assert_eq!(registros[53].codigo, "GO200054");
    }

    #[test]
    fn campos_do_resultado_mapeados_para_codigos() {
        let mut resultado = ResultadoCalculo::novo(Programa::Fomentar);
        resultado.definir("debito_incentivadas", 1234.56);
        resultado.definir("saldo_credor_a_transportar", 78.9);

        let registros = gerar_registro_e115(&resultado);
        assert_eq!(registros[0].valor, 1234.56); // GO200001
        // GO200026 e GO200048 apontam para o mesmo campo
        assert_eq!(registros[25].valor, 78.9);
        assert_eq!(registros[47].valor, 78.9);
    }

    #[test]
    fn extracao_filtra_codigos_go200() {
        let conteudo = "\
|E115|GO200001|150,00|Débito incentivado|
|E115|GO000123|999,00|Outro código|
|E115|GO200003|25,50||
";
        let escrituracao = ler_sped_completo(conteudo).unwrap();
        let declarados = extrair_e115_do_sped(&escrituracao);

        assert_eq!(declarados.len(), 2);
        assert_eq!(declarados[0].codigo, "GO200001");
        assert_eq!(declarados[0].valor, 150.0);
        assert_eq!(declarados[1].valor, 25.5);
    }

    #[test]
    fn confronto_classifica_cada_situacao() {
        let calculados = vec![
            RegistroE115 {
                codigo: "GO200001".into(),
                descricao: "a".into(),
                valor: 100.0,
            },
            RegistroE115 {
                codigo: "GO200002".into(),
                descricao: "b".into(),
                valor: 50.0,
            },
            RegistroE115 {
                codigo: "GO200003".into(),
                descricao: "c".into(),
                valor: 10.0,
            },
        ];
        let declarados = vec![
            RegistroE115 {
                codigo: "GO200001".into(),
                descricao: "a".into(),
                valor: 100.005,
            },
            RegistroE115 {
                codigo: "GO200002".into(),
                descricao: "b".into(),
                valor: 40.0,
            },
            RegistroE115 {
                codigo: "GO200099".into(),
                descricao: "x".into(),
                valor: 7.0,
            },
        ];

        let confronto = confrontar_e115(&calculados, &declarados);

        assert_eq!(confronto.coincidencias, 1);
        assert_eq!(confronto.divergencias, 1);
        assert_eq!(confronto.ausentes_no_sped, 1);
        assert_eq!(confronto.extras_no_sped, 1);
        assert_eq!(confronto.itens.len(), 4);
        assert_eq!(confronto.total_calculado, 160.0);
        assert!((confronto.percentual_coincidencia - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn texto_sped_usa_virgula_decimal() {
        let registros = vec![RegistroE115 {
            codigo: "GO200001".into(),
            descricao: "Débito do ICMS das Operações Incentivadas".into(),
            valor: 1234.5,
        }];

        assert_eq!(
            gerar_texto_sped(&registros),
            "|E115|GO200001|1234,50|Débito do ICMS das Operações Incentivadas|\n"
        );
    }
}
