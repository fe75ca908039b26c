use async_trait::async_trait;
use benchwatch_core::{
    BenchError, PriceSource, RawObservation, SourceKind, SourceParams, SourceRegistry,
};
use rust_decimal_macros::dec;
use std::sync::Arc;

struct Fixed(SourceKind);

#[async_trait]
impl PriceSource for Fixed {
    fn name(&self) -> &'static str {
        self.0.as_str()
    }

    fn kind(&self) -> SourceKind {
        self.0
    }

    async fn fetch(&self, _params: &SourceParams) -> Result<Vec<RawObservation>, BenchError> {
        Ok(vec![RawObservation::new("2024-01-02", dec!(1))])
    }
}

#[tokio::test]
async fn lookup_by_kind() {
    let mut reg = SourceRegistry::new();
    reg.register(Arc::new(Fixed(SourceKind::Fred)));
    reg.register(Arc::new(Fixed(SourceKind::Yahoo)));

    assert_eq!(reg.kinds(), vec![SourceKind::Fred, SourceKind::Yahoo]);
    let src = reg.get(SourceKind::Fred).unwrap();
    let rows = src
        .fetch(&SourceParams::Fred {
            series_id: "X".into(),
        })
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    let err = reg.get(SourceKind::Eia).err().unwrap();
    assert_eq!(
        err,
        BenchError::UnsupportedSource {
            kind: "EIA".into()
        }
    );
    assert!(err.is_fetch_failure());
}

#[test]
fn map_sources_keeps_kinds() {
    let mut reg = SourceRegistry::new();
    reg.register(Arc::new(Fixed(SourceKind::Eia)));
    let mut wrapped = 0;
    let reg = reg.map_sources(|s| {
        wrapped += 1;
        s
    });
    assert_eq!(wrapped, 1);
    assert_eq!(reg.len(), 1);
    assert!(reg.get(SourceKind::Eia).is_ok());
}
