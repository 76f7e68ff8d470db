use execution_time::ExecutionTime;
use std::{fs, path::Path, process};

use apurador_incentivos_sped::{
    Config, ConfigPrograma, Escrituracao, Programa, RegistroE115, ResultadoCalculo, SpedError,
    SpedResult, calcular_fomentar, calcular_logproduzir, calcular_progoias,
    classificar_operacoes, confrontar_com_resultado, confrontar_e115, estatisticas,
    extrair_dados_validacao, extrair_e115_do_sped, extrair_header_info, formatar_moeda,
    gerar_registro_e115, gerar_texto_sped, get_config, ler_sped_completo, resumir_confronto,
    validar_estrutura,
};

fn main() {
    // A forma mais idiomática de reportar erros ao usuário final sem stack trace técnico
    if let Err(err) = run() {
        eprintln!("\n[ERRO CRÍTICO]: {err}");
        process::exit(1);
    }
}

fn run() -> SpedResult<()> {
    let timer = ExecutionTime::start();

    // 1. Obter Configurações
    let mut config = get_config()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if config.verbose { "debug" } else { "info" },
    ))
    .init();

    println!(
        "Apuração {} de {} arquivo(s) SPED EFD ICMS/IPI\n",
        config.programa,
        config.arquivos.len()
    );

    // 2. Processar cada período em ordem, transportando o saldo credor
    let arquivos = config.arquivos.clone();
    let mut sucessos = 0;

    for arquivo in &arquivos {
        println!("==> {}", arquivo.display());

        match processar_arquivo(arquivo, &config) {
            Ok(saldo_credor) => {
                sucessos += 1;
                config
                    .config_programa
                    .definir_saldo_credor_anterior(saldo_credor);
            }
            Err(err) => {
                log::error!("Falha ao processar {}: {err}", arquivo.display());
                eprintln!("\n[ERRO]: {err}\n");
            }
        }
    }

    if sucessos == 0 {
        return Err(SpedError::dados_ausentes(
            "apuração",
            "nenhum arquivo SPED pôde ser processado",
        ));
    }

    println!(
        "Apuração concluída: {sucessos} de {} arquivo(s).\n",
        arquivos.len()
    );
    timer.print_elapsed_time();

    Ok(())
}

/// Processa um período completo e devolve o saldo credor a transportar
/// para o período seguinte.
fn processar_arquivo(arquivo: &Path, config: &Config) -> SpedResult<f64> {
    // 1. Leitura e decodificação
    let bytes = fs::read(arquivo).map_err(|source| SpedError::IoReader {
        source,
        arquivo: arquivo.to_path_buf(),
    })?;
    let conteudo = decodificar(&bytes);

    // 2. Estrutura e registros
    let escrituracao = ler_sped_completo(&conteudo)?;
    let validacao = validar_estrutura(&escrituracao);
    for erro in &validacao.erros {
        log::warn!("Estrutura: {erro}");
    }

    if config.verbose {
        let stats = estatisticas(&escrituracao);
        log::debug!(
            "{} registros em {} blocos: {:?}",
            stats.total_registros,
            stats.registros_por_bloco.len(),
            stats.registros_por_tipo
        );
    }

    let header = extrair_header_info(&escrituracao)?;
    println!(
        "    {} | CNPJ {} | Período {}",
        header.nome_empresa, header.cnpj, header.periodo
    );

    // 3. Classificação e cálculo
    let operacoes = classificar_operacoes(&escrituracao, config.programa);
    let resultado = calcular(&operacoes, &config.config_programa)?;

    imprimir_resumo(&resultado);

    // 4. E115 calculado vs declarado
    let e115_gerado = gerar_registro_e115(&resultado);
    let e115_declarado = extrair_e115_do_sped(&escrituracao);
    if !e115_declarado.is_empty() {
        let confronto = confrontar_e115(&e115_gerado, &e115_declarado);
        println!(
            "    E115: {} coincidências, {} divergências ({:.1}% de coincidência)",
            confronto.coincidencias, confronto.divergencias, confronto.percentual_coincidencia
        );
    }

    // 5. Confronto com a apuração declarada no E110
    let dados = extrair_dados_validacao(&escrituracao);
    for aviso in &dados.avisos {
        log::warn!("Validação: {aviso}");
    }
    let itens = confrontar_com_resultado(&dados, &resultado);
    let resumo = resumir_confronto(&itens);
    println!(
        "    Confronto com o SPED: {:?} ({} de {} verificações coincidem)\n",
        resumo.status_geral, resumo.verificacoes_ok, resumo.total_verificacoes
    );

    // 6. Exportação opcional
    if let Some(dir) = &config.saida {
        exportar(dir, arquivo, &escrituracao, &resultado, &e115_gerado)?;
    }

    Ok(resultado.valor("saldo_credor_a_transportar"))
}

/// UTF-8 estrito; arquivos legados do validador da EFD vêm em Windows-1252.
fn decodificar(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(texto) => texto.to_string(),
        Err(_) => {
            log::debug!("Conteúdo não é UTF-8, decodificando como Windows-1252");
            let (texto, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            texto.into_owned()
        }
    }
}

fn calcular(
    operacoes: &apurador_incentivos_sped::OperacoesClassificadas,
    config: &ConfigPrograma,
) -> SpedResult<ResultadoCalculo> {
    match config {
        ConfigPrograma::Fomentar(c) => calcular_fomentar(operacoes, c),
        ConfigPrograma::Progoias(c) => calcular_progoias(operacoes, c),
        ConfigPrograma::Logproduzir(c) => calcular_logproduzir(operacoes, c),
    }
}

fn imprimir_resumo(resultado: &ResultadoCalculo) {
    let linhas: &[(&str, &str)] = match resultado.programa() {
        Programa::Fomentar => &[
            ("Total de débitos", "total_debitos"),
            ("Total de créditos", "total_creditos"),
            ("ICMS financiado", "icms_financiado"),
            ("Total geral a pagar", "total_geral_pagar"),
            ("Saldo credor a transportar", "saldo_credor_a_transportar"),
        ],
        Programa::Progoias => &[
            ("Base de cálculo", "base_calculo"),
            ("Crédito outorgado", "credito_progoias"),
            ("ICMS após ProGoiás", "icms_apos_progoias"),
            ("Saldo credor a transportar", "saldo_credor_a_transportar"),
        ],
        Programa::Logproduzir => &[
            ("Fretes interestaduais", "fretes_interestaduais"),
            ("Crédito líquido", "credito_liquido"),
            ("ICMS final", "icms_final"),
            ("Saldo credor a transportar", "saldo_credor_a_transportar"),
        ],
    };

    for (rotulo, campo) in linhas {
        println!("    {rotulo}: {}", formatar_moeda(resultado.valor(campo)));
    }
}

/// Grava a apuração em CSV e os E115 gerados em texto no formato SPED.
fn exportar(
    dir: &Path,
    arquivo: &Path,
    escrituracao: &Escrituracao,
    resultado: &ResultadoCalculo,
    e115: &[RegistroE115],
) -> SpedResult<()> {
    fs::create_dir_all(dir)?;

    let base = arquivo
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("apuracao");

    let caminho_csv = dir.join(format!("{base}_apuracao.csv"));
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(&caminho_csv)?;
    writer.write_record(["campo", "valor"])?;
    for (campo, valor) in resultado.campos() {
        let valor = format!("{valor:.2}");
        writer.write_record([campo, valor.as_str()])?;
    }
    writer.flush()?;

    let caminho_e115 = dir.join(format!("{base}_e115.txt"));
    fs::write(&caminho_e115, gerar_texto_sped(e115))?;

    log::info!(
        "Exportados {} ({} registros) e {}",
        caminho_csv.display(),
        escrituracao.total_registros(),
        caminho_e115.display()
    );

    Ok(())
}
