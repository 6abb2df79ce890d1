//! Handler for `bemdecl entity`.

use miette::Result;

use bemdecl_core::BemEntity;

pub fn exec(notations: &[String]) -> Result<()> {
    for notation in notations {
        let entity: BemEntity = notation.parse()?;
        let kind = if entity.is_mod() {
            "modifier"
        } else if entity.is_elem() {
            "element"
        } else {
            "block"
        };
        println!("{entity}\t{kind}");
    }
    Ok(())
}
