use contract_typeset::layout::{AssetSource, LayoutConfig};
use contract_typeset::{pagesize, typeset, Mm};

fn main() {
    let mut body = String::from("PRIMERA:\n");
    body.push_str(&lipsum::lipsum(120));
    body.push_str("\n\n\nOBJETO DEL CONTRATO\n");
    for _ in 0..12 {
        body.push_str(&lipsum::lipsum(60));
        body.push('\n');
    }
    body.push_str("\nFirmas:\n");
    body.push_str("El jugador\tLa academia");

    let mut config = LayoutConfig::default()
        .with_page_size(pagesize::LETTER)
        .with_margin(Mm(25.0))
        .with_title("CONTRATO DE PRESTACION DE SERVICIOS DEPORTIVOS")
        .with_footer_label("Página")
        .with_author("Academia Deportiva")
        .with_subject("Contrato de jugador");

    // an optional watermark path as the first argument; a bad path only logs a warning
    if let Some(path) = std::env::args().nth(1) {
        config = config.with_watermark(AssetSource::Path(path.into()));
    }

    let pdf = typeset(&body, &config).expect("can typeset contract");
    std::fs::write("contract.pdf", pdf).expect("can write contract.pdf");
}
