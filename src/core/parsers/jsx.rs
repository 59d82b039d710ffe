use std::sync::Arc;

use swc_common::{FileName, GLOBALS, Globals, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

use crate::error::{Error, Result};

pub struct ParsedJSX {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
}

/// Parse JSX/TSX source code into an AST.
///
/// Every file gets its own `SourceMap`, so calls are independent and safe to
/// run on parallel workers. Plain `.ts`/`.js` files parse under the same
/// TSX syntax.
pub fn parse_jsx_source(code: String, file_path: &str) -> Result<ParsedJSX> {
    let source_map: Arc<SourceMap> = Default::default();

    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        });

        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let module = parser.parse_module().map_err(|e| Error::Parse {
            path: file_path.to_string(),
            message: format!("{:?}", e.kind()),
        })?;

        Ok(ParsedJSX { module, source_map })
    })
}
