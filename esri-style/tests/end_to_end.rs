use approx::assert_relative_eq;
use assert_matches::assert_matches;
use esri_style::{
    AttributeMap, Color, EsriLayerStyle, EsriStyleBuilder, LinearUnit, RenderFill, RenderImage,
    RenderStyle, SelectedStyle, SimpleFeature, StyleSelector,
};

const STATUS_LAYER: &str = include_str!("../test-data/status_unique_value.json");
const CLASS_BREAKS_LAYER: &str = include_str!("../test-data/class_breaks.json");
const PICTURE_LAYER: &str = include_str!("../test-data/picture_symbols.json");

fn build(json: &str) -> EsriLayerStyle {
    tokio_test::block_on(
        EsriStyleBuilder::new_json(json)
            .with_linear_unit(LinearUnit::Meters)
            .build(),
    )
    .expect("failed to build style")
}

fn feature(id: &str) -> SimpleFeature {
    SimpleFeature::new(Some(id), AttributeMap::new())
}

fn feature_style(styles: &[SelectedStyle<RenderStyle, esri_style::LabelStyle>]) -> &RenderStyle {
    match &styles[0] {
        SelectedStyle::Feature(style) => style,
        SelectedStyle::Label { .. } => panic!("feature style must come first"),
    }
}

#[test]
fn unique_value_selection() {
    let selector = StyleSelector::new(build(STATUS_LAYER).table);

    let active = feature("1").with_attribute("STATUS", "ACTIVE");
    let styles = selector.select_style(&active, 10.0).expect("no style");
    let style = feature_style(&styles);
    assert_eq!(style.fill, Some(RenderFill::Color(Color::rgba(0, 200, 0, 255))));

    let unknown = feature("2").with_attribute("STATUS", "UNKNOWN");
    let styles = selector.select_style(&unknown, 10.0).expect("no style");
    let style = feature_style(&styles);
    assert_eq!(style.fill, None);
    let stroke = style.stroke.as_ref().expect("default rule has an outline");
    assert_eq!(stroke.color, Color::rgba(128, 128, 128, 255));
    assert_eq!(stroke.line_dash, vec![10.0]);

    let missing = feature("3");
    let styles = selector.select_style(&missing, 10.0).expect("no style");
    assert_eq!(feature_style(&styles), style);
}

#[test]
fn legend_follows_rule_order() {
    let style = build(STATUS_LAYER);
    let legend: Vec<&str> = style.table.legend().map(|(title, _)| title).collect();
    assert_eq!(legend, vec!["Active", "Inactive", "Unknown status"]);
}

#[test]
fn label_visibility_window() {
    let selector = StyleSelector::new(build(STATUS_LAYER).table);
    let depot = feature("17")
        .with_attribute("STATUS", "INACTIVE")
        .with_attribute("name", "Depot");

    let styles = selector.select_style(&depot, 0.1).expect("no style");
    assert_eq!(styles.len(), 2);
    assert_matches!(&styles[1], SelectedStyle::Label { text, style } if text == "Depot\n17" && style.font == "normal bold 9pt Arial");

    let styles = selector.select_style(&depot, 0.5).expect("no style");
    assert_eq!(styles.len(), 1);
}

#[test]
fn class_break_selection() {
    let style = build(CLASS_BREAKS_LAYER);
    assert_relative_eq!(style.table.opacity(), 0.5);
    assert!(style.visibility.contains(50.0));
    assert!(!style.visibility.contains(100.0));

    let selector = StyleSelector::new(style.table);
    let measured = feature("5")
        .with_attribute("VALUE", 15.0)
        .with_attribute("UNIT", "mg");

    let styles = selector.select_style(&measured, 1.0).expect("no style");
    let RenderImage::Circle(circle) = feature_style(&styles).image.as_ref().expect("no image") else {
        panic!("circle expected");
    };
    assert_eq!(circle.radius, 5.0);
    assert_eq!(circle.fill, Some(Color::rgba(255, 0, 0, 128)));
    assert_matches!(&styles[1], SelectedStyle::Label { text, .. } if text == "15 mg");

    let outside = feature("6").with_attribute("VALUE", 25.0);
    assert!(selector.select_style(&outside, 1.0).is_none());
}

#[test]
fn hidden_features_are_not_styled() {
    let selector = StyleSelector::new(build(STATUS_LAYER).table);
    let hidden = feature("1")
        .with_attribute("STATUS", "ACTIVE")
        .with_attribute("hidden", true);
    assert!(selector.select_style(&hidden, 0.1).is_none());
}

#[cfg(feature = "image")]
#[test]
fn picture_symbols() {
    use esri_style::symbol::FillStyle;

    let style = build(PICTURE_LAYER);
    let rules = style.table.feature_rules().rules();

    assert_matches!(&rules[0].style.fill, Some(FillStyle::Pattern(image)) if image.width() == 1);
    assert_eq!(
        rules[0].style.stroke.as_ref().expect("no outline").line_dash,
        vec![1.0, 5.0]
    );
    assert!(rules[1].style.fill.is_none());

    let icon = rules[2].style.icon.as_ref().expect("no icon");
    assert!(icon.src.starts_with("data:image/png;base64,iVBORw0KGgo"));
    assert_eq!(icon.rotation, 45.0);

    let selector = StyleSelector::new(style.table);
    let spring = feature("1").with_attribute("KIND", "spring");
    let styles = selector.select_style(&spring, 1.0).expect("no style");
    assert_matches!(
        feature_style(&styles).image,
        Some(RenderImage::Icon { rotation, .. }) if (rotation - std::f64::consts::FRAC_PI_4).abs() < 1e-12
    );
}
