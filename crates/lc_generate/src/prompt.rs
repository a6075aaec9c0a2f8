use lc_core::{ExtractedArticle, SearchEnrichment, StyleConfig};

/// Hard cap on the article body embedded into the prompt, in characters.
/// Bounds token cost for very long source articles.
pub const BODY_PROMPT_LIMIT: usize = 1500;

/// Builds the system prompt for one generation request. Pure and
/// deterministic: identical inputs produce the identical prompt. Sections for
/// enrichment and the reference template are omitted entirely when absent so
/// the model never sees dangling headers.
pub fn build_prompt(
    config: &StyleConfig,
    article: &ExtractedArticle,
    selected_images: &[String],
    enrichment: &SearchEnrichment,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "あなたは企業のLINE配信記事のプロの作成者です。元のブログ記事をLINE配信向けに最適化された記事に書き換える必要があります。\n\n",
    );

    prompt.push_str("# 企業情報\n");
    prompt.push_str(&format!("- 企業名: {}\n", config.company_name));
    prompt.push_str(&format!("- 企業URL: {}\n\n", config.company_url));

    prompt.push_str("# 元のブログ記事\n");
    prompt.push_str(&format!("タイトル: {}\n\n", article.title));
    prompt.push_str("コンテンツ:\n");
    prompt.push_str(&truncate_chars(&article.content, BODY_PROMPT_LIMIT));
    prompt.push_str("\n\n");

    if !enrichment.is_empty() {
        prompt.push_str("# Web検索で収集した追加情報\n\n");
        prompt.push_str(enrichment.summary.trim());
        prompt.push_str(
            "\n\nこの情報を適切に利用して、記事の内容を充実させてください。ただし、過度に専門的になりすぎず、LINE配信の読みやすさを保ってください。\n\n",
        );
    }

    prompt.push_str("# LINE配信記事の要件\n");
    prompt.push_str(&format!("- 記事の長さ: {}\n", config.content_length));
    prompt.push_str(&format!(
        "- 文体: {}（丁寧/カジュアル）\n",
        config.writing_style.as_japanese()
    ));
    prompt.push_str(&format!(
        "- 改行位置: {}\n",
        config.line_break_style.as_japanese()
    ));
    prompt.push_str(&format!("- かっこの種類: {}\n", config.bracket_type));
    prompt.push_str(&format!("- 敬称: {}\n", config.honorific));
    prompt.push_str(&format!("- 子どもの敬称: {}\n", config.child_honorific));
    prompt.push_str(&format!(
        "- 感情を誘発させる文頭: {}\n",
        if config.add_emotional_intro {
            "必要"
        } else {
            "不要"
        }
    ));
    prompt.push_str(&format!("- 絵文字の種類: {}\n", config.emoji_types));
    prompt.push_str(&format!("- 絵文字の量: {}個程度/配信\n", config.emoji_count));
    prompt.push_str(&format!("- 箇条書き記号: {}\n", config.bullet_point));
    prompt.push_str(&format!("- 日時フォーマット: {}\n", config.date_format));
    prompt.push_str(&format!("- 挨拶文: {}\n", config.greeting_text));
    prompt.push_str(&format!("- 元記事への誘導: {}\n", config.redirect_text));
    prompt.push_str(&format!(
        "- 画像: {}\n",
        if selected_images.is_empty() {
            "なし".to_string()
        } else {
            format!("あり ({}枚)", selected_images.len())
        }
    ));

    if !selected_images.is_empty() {
        // Images are attached out of band, the text must not describe them.
        prompt.push_str(&format!(
            "\n記事には{}枚の添付画像があります。画像について言及せず、テキストのみを生成してください。\n",
            selected_images.len()
        ));
    }

    if let Some(template) = config
        .reference_template
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    {
        prompt.push_str(
            "\n以下のテンプレートを参考にして、全体的な文調とフォーマットを模倣してください：\n\n",
        );
        prompt.push_str(template.trim());
        prompt.push('\n');
    }

    prompt.push_str("\n# 指示\n");
    prompt.push_str(
        "1. オリジナルのブログコンテンツの主要なメッセージを保持しながら、LINEのカジュアルな配信向けに最適化してください。\n",
    );
    prompt.push_str(
        "2. 指定された絵文字を適切な場所に使い、親しみやすさを演出してください。\n",
    );
    prompt.push_str("3. 記事の最後には必ず元の記事へのリンク誘導文を入れてください。\n");
    prompt.push_str("4. 顧客目線で、読者の興味を引く内容に仕上げてください。\n");
    prompt.push_str("5. 文字数は指定された長さにしてください。\n");
    prompt.push_str("6. 必要に応じて箇条書きを使って見やすくしてください。\n");
    prompt.push_str(
        "7. Web検索から得た追加情報がある場合は、それも活用して記事の価値を高めてください。ただし、情報源の詳細なURLなどは含めないでください。\n",
    );
    prompt.push_str(
        "\n最終的な出力は、LINEで配信するテキストのみを含めてください。マークダウン形式は必要ありません。\n",
    );

    prompt
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
