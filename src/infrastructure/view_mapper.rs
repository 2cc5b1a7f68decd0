// Mapper to convert rendered views and calendar grids to JSON payloads
use crate::application::track_renderer::{DeviceLayer, RenderedView};
use crate::domain::chart::{ChartData, ChartKind, SeriesData};
use crate::domain::overlay::{MarkerStyle, OverlayPoint};
use crate::domain::selection::DateSelection;
use crate::domain::track::BoundingBox;
use crate::infrastructure::calendar_grid::CalendarGrid;
use chrono::Datelike;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionDto>,
    pub viewport: Option<ViewportDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_overlays: Option<usize>,
    pub layers: Vec<FeatureCollectionDto>,
    pub chart: Option<ChartDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionDto {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
pub struct ViewportDto {
    /// `[[min_lat, min_lon], [max_lat, max_lon]]`
    pub bounds: [[f64; 2]; 2],
    pub center: [f64; 2],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCollectionDto {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub device_id: String,
    /// First and last timestamp, the ends of the color gradient
    pub time_range: [String; 2],
    pub features: Vec<FeatureDto>,
}

#[derive(Debug, Serialize)]
pub struct FeatureDto {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: PointDto,
    pub properties: PropertiesDto,
}

#[derive(Debug, Serialize)]
pub struct PointDto {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `[lon, lat]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesDto {
    pub popup_content: String,
    pub radius: f64,
    pub fill_color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDto {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub kind: &'static str,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub series: Vec<SeriesDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDto {
    pub id: String,
    pub name: String,
    pub points: Vec<ChartPointDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPointDto {
    pub time_ms: i64,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct CalendarDto {
    pub months: Vec<MonthDto>,
}

#[derive(Debug, Serialize)]
pub struct MonthDto {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayDto>,
}

#[derive(Debug, Serialize)]
pub struct DayDto {
    pub day: u32,
    pub available: bool,
    pub background: Option<String>,
}

pub fn view_to_dto(
    view: Option<&RenderedView>,
    selection: Option<&DateSelection>,
    style: &MarkerStyle,
) -> ViewDto {
    ViewDto {
        selection: selection.and_then(selection_to_dto),
        viewport: view.map(|v| viewport_to_dto(&v.viewport)),
        attached_overlays: None,
        layers: view
            .map(|v| v.layers.iter().map(|l| layer_to_dto(l, style)).collect())
            .unwrap_or_default(),
        chart: view.and_then(|v| v.chart.as_ref()).map(chart_to_dto),
    }
}

fn selection_to_dto(selection: &DateSelection) -> Option<SelectionDto> {
    let (start, end) = selection.window().ok()?;
    Some(SelectionDto {
        start: start.to_rfc3339(),
        end: end.to_rfc3339(),
    })
}

pub fn viewport_to_dto(bbox: &BoundingBox) -> ViewportDto {
    let (lat, lon) = bbox.center();
    ViewportDto {
        bounds: [[bbox.min_lat, bbox.min_lon], [bbox.max_lat, bbox.max_lon]],
        center: [lat, lon],
    }
}

fn layer_to_dto(layer: &DeviceLayer, style: &MarkerStyle) -> FeatureCollectionDto {
    FeatureCollectionDto {
        kind: "FeatureCollection",
        device_id: layer.device_id.clone(),
        time_range: [layer.extent.min.to_rfc3339(), layer.extent.max.to_rfc3339()],
        features: layer.points.iter().map(|p| point_to_dto(p, style)).collect(),
    }
}

fn point_to_dto(point: &OverlayPoint, style: &MarkerStyle) -> FeatureDto {
    FeatureDto {
        kind: "Feature",
        geometry: PointDto {
            kind: "Point",
            coordinates: [point.longitude, point.latitude],
        },
        properties: PropertiesDto {
            popup_content: point.popup.clone(),
            radius: style.radius,
            fill_color: point.color.to_css(),
            weight: style.weight,
            opacity: style.opacity,
            fill_opacity: style.fill_opacity,
        },
    }
}

pub fn chart_to_dto(chart: &ChartData) -> ChartDto {
    let kind = match chart.kind {
        ChartKind::Line => "line",
        ChartKind::MultiLine => "multiLine",
    };

    ChartDto {
        id: chart.id.clone(),
        title: chart.title.clone(),
        unit: chart.unit.clone(),
        kind,
        y_min: chart.y_min,
        y_max: chart.y_max,
        series: chart.series.iter().map(series_to_dto).collect(),
    }
}

fn series_to_dto(series: &SeriesData) -> SeriesDto {
    SeriesDto {
        id: series.id.clone(),
        name: series.name.clone(),
        points: series
            .points
            .iter()
            .map(|p| ChartPointDto {
                time_ms: p.time_ms,
                value: p.value,
            })
            .collect(),
    }
}

pub fn calendar_to_dto(grid: &CalendarGrid) -> CalendarDto {
    let mut months: Vec<MonthDto> = Vec::new();

    for cell in grid.cells() {
        let (year, month) = (cell.day.year(), cell.day.month());
        let day = DayDto {
            day: cell.day.day(),
            available: cell.background.is_some(),
            background: cell.background.clone(),
        };
        let same_month = months
            .last()
            .is_some_and(|m| m.year == year && m.month == month);
        if !same_month {
            months.push(MonthDto {
                year,
                month,
                days: Vec::new(),
            });
        }
        if let Some(current) = months.last_mut() {
            current.days.push(day);
        }
    }

    CalendarDto { months }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::track_renderer::TrackRenderer;
    use crate::domain::calendar::mark_widget;
    use crate::domain::position::{PositionBatch, PositionRecord};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_view_to_dto_json_shape() {
        let batch: PositionBatch = (0..2)
            .map(|i| {
                let mut r = PositionRecord::new(
                    "phone".to_string(),
                    Utc.timestamp_opt(1_700_000_000 + i * 60, 0).unwrap(),
                    48.0 + i as f64,
                    11.0,
                );
                r.battery_level = Some(75.0);
                r
            })
            .collect();
        let view = TrackRenderer::default().render(batch).unwrap();

        let dto = view_to_dto(Some(&view), None, &MarkerStyle::default());
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["viewport"]["bounds"], serde_json::json!([[48.0, 11.0], [49.0, 11.0]]));
        assert_eq!(json["viewport"]["center"], serde_json::json!([48.5, 11.0]));
        assert_eq!(json["layers"][0]["type"], "FeatureCollection");
        assert_eq!(json["layers"][0]["deviceId"], "phone");
        assert_eq!(
            json["layers"][0]["timeRange"],
            serde_json::json!(["2023-11-14T22:13:20+00:00", "2023-11-14T22:14:20+00:00"])
        );

        let feature = &json["layers"][0]["features"][1];
        assert_eq!(feature["geometry"]["coordinates"], serde_json::json!([11.0, 49.0]));
        assert_eq!(feature["properties"]["fillColor"], "rgb(255, 120, 0)");
        assert_eq!(feature["properties"]["radius"], 3.0);
        assert_eq!(json["chart"]["kind"], "line");
        assert_eq!(json["chart"]["series"][0]["points"][0]["timeMs"], 1_700_000_000_000i64);
        assert!(json.get("selection").is_none());
    }

    #[test]
    fn test_empty_view_dto() {
        let sel = DateSelection::day(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let dto = view_to_dto(None, Some(&sel), &MarkerStyle::default());
        assert!(dto.layers.is_empty());
        assert!(dto.viewport.is_none());
        assert!(dto.chart.is_none());
        assert_eq!(dto.selection.unwrap().start, "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_unrepresentable_selection_is_omitted() {
        let sel = DateSelection::day(NaiveDate::MAX);
        let dto = view_to_dto(None, Some(&sel), &MarkerStyle::default());
        assert!(dto.selection.is_none());
    }

    #[test]
    fn test_calendar_to_dto_groups_months() {
        let mut grid = CalendarGrid::new(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(), 2, "#0a0".into());
        grid.render();
        mark_widget(&[NaiveDate::from_ymd_opt(2024, 5, 3).unwrap()], &mut grid);

        let dto = calendar_to_dto(&grid);
        assert_eq!(dto.months.len(), 2);
        assert_eq!((dto.months[0].year, dto.months[0].month), (2024, 4));
        assert_eq!(dto.months[0].days.len(), 30);
        assert_eq!(dto.months[1].days.len(), 31);
        assert!(dto.months[1].days[2].available);
        assert_eq!(dto.months[1].days[2].background.as_deref(), Some("#0a0"));
        assert_eq!(
            dto.months.iter().flat_map(|m| &m.days).filter(|d| d.available).count(),
            1
        );
    }
}
